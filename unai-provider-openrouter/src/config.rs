//! Connection settings for the OpenRouter API.

use unai_types::ChatError;

/// Public OpenRouter API base URL.
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Environment variable holding the API base URL (required).
pub const BASE_URL_VAR: &str = "OPENROUTER_BASE_URL";
/// Environment variable holding the API credential (required).
pub const API_KEY_VAR: &str = "OPENROUTER_API_KEY";
/// Environment variable overriding the referer header (optional).
pub const SITE_URL_VAR: &str = "OPENROUTER_SITE_URL";
/// Environment variable overriding the application title header (optional).
pub const APP_NAME_VAR: &str = "OPENROUTER_APP_NAME";

const DEFAULT_REFERER: &str = "http://localhost";
const DEFAULT_APP_TITLE: &str = "UnAi Chat Application";

/// Endpoint and credential configuration.
///
/// Built once at process start and passed by reference to the request
/// builder. Nothing reads the environment after construction.
///
/// # Example
///
/// ```
/// use unai_provider_openrouter::{OpenRouterConfig, OPENROUTER_BASE_URL};
///
/// let config = OpenRouterConfig::new(OPENROUTER_BASE_URL, "sk-or-...")
///     .unwrap()
///     .referer("https://chat.example.com")
///     .app_title("Example Chat");
/// ```
#[derive(Clone)]
pub struct OpenRouterConfig {
    base_url: String,
    api_key: String,
    referer: String,
    app_title: String,
}

impl OpenRouterConfig {
    /// Create a configuration for the given base URL and credential.
    ///
    /// Only the URL is validated here. An empty credential is accepted and
    /// rejected later by the request builder, before any network call.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, ChatError> {
        let base_url = base_url.into();
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ChatError::Configuration("API base URL is empty".into()));
        }
        reqwest::Url::parse(trimmed).map_err(|e| {
            ChatError::Configuration(format!("invalid API base URL {trimmed:?}: {e}"))
        })?;

        Ok(Self {
            base_url: trimmed.to_string(),
            api_key: api_key.into(),
            referer: DEFAULT_REFERER.into(),
            app_title: DEFAULT_APP_TITLE.into(),
        })
    }

    /// Read the configuration from the process environment.
    ///
    /// `OPENROUTER_BASE_URL` and `OPENROUTER_API_KEY` are required;
    /// `OPENROUTER_SITE_URL` and `OPENROUTER_APP_NAME` override the referer
    /// and title headers.
    pub fn from_env() -> Result<Self, ChatError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ChatError> {
        let required = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| ChatError::Configuration(format!("{name} is not set")))
        };
        let optional = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::new(required(BASE_URL_VAR)?, required(API_KEY_VAR)?)?;
        if let Some(site_url) = optional(SITE_URL_VAR) {
            config.referer = site_url;
        }
        if let Some(app_name) = optional(APP_NAME_VAR) {
            config.app_title = app_name;
        }
        Ok(config)
    }

    /// Override the referer header identifying the calling site.
    #[must_use]
    pub fn referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = referer.into();
        self
    }

    /// Override the application title header.
    #[must_use]
    pub fn app_title(mut self, title: impl Into<String>) -> Self {
        self.app_title = title.into();
        self
    }

    /// The API base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The bearer credential.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The referer header value.
    pub fn referer_header(&self) -> &str {
        &self.referer
    }

    /// The application title header value.
    pub fn app_title_header(&self) -> &str {
        &self.app_title
    }

    /// The chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl std::fmt::Debug for OpenRouterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("referer", &self.referer)
            .field("app_title", &self.app_title)
            .finish()
    }
}
