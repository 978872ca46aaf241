//! Outbound request construction.

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use unai_types::{ChatError, DEFAULT_MODEL, Message};

use crate::config::OpenRouterConfig;
use crate::types::ChatCompletionBody;

/// Header identifying the calling site (`HTTP-Referer`).
pub const REFERER_HEADER: HeaderName = HeaderName::from_static("http-referer");
/// Header naming the calling application (`X-Title`).
pub const TITLE_HEADER: HeaderName = HeaderName::from_static("x-title");

/// Optional sampling settings attached to every request.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompletionOptions {
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    pub temperature: Option<f64>,
}

/// A fully specified completion request, ready to execute.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Target endpoint.
    pub endpoint: String,
    /// HTTP method (always POST).
    pub method: Method,
    /// Content type, bearer credential, referer and title headers.
    pub headers: HeaderMap,
    /// JSON body.
    pub body: ChatCompletionBody,
}

impl ChatRequest {
    /// Whether this request asks for an SSE response.
    pub fn is_streaming(&self) -> bool {
        self.body.stream
    }
}

/// Builds [`ChatRequest`]s from conversation state.
///
/// Pure: the output depends only on the arguments and the borrowed
/// configuration.
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<'a> {
    config: &'a OpenRouterConfig,
    options: CompletionOptions,
}

impl<'a> RequestBuilder<'a> {
    /// Create a builder over the given configuration.
    pub fn new(config: &'a OpenRouterConfig) -> Self {
        Self {
            config,
            options: CompletionOptions::default(),
        }
    }

    /// Attach sampling options.
    #[must_use]
    pub fn options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    /// Build a request for `history` followed by `user`.
    ///
    /// Messages are sent as role and content only; [`Message::error`] flags
    /// stay local. `stream` should be true exactly when the caller will
    /// consume deltas.
    /// An empty `model` falls back to [`DEFAULT_MODEL`]. Fails with
    /// [`ChatError::Configuration`] when the credential is missing, before
    /// anything touches the network.
    pub fn build(
        &self,
        history: &[Message],
        user: Message,
        model: &str,
        stream: bool,
    ) -> Result<ChatRequest, ChatError> {
        let headers = self.headers()?;

        let model = if model.trim().is_empty() {
            DEFAULT_MODEL
        } else {
            model
        };

        let messages = history
            .iter()
            .cloned()
            .chain(std::iter::once(user))
            .map(|message| Message::new(message.role, message.content))
            .collect();

        Ok(ChatRequest {
            endpoint: self.config.completions_url(),
            method: Method::POST,
            headers,
            body: ChatCompletionBody {
                model: model.to_string(),
                messages,
                stream,
                max_tokens: self.options.max_tokens,
                temperature: self.options.temperature,
            },
        })
    }

    fn headers(&self) -> Result<HeaderMap, ChatError> {
        let api_key = self.config.api_key().trim();
        if api_key.is_empty() {
            return Err(ChatError::Configuration("API credential is missing".into()));
        }

        let mut authorization = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| ChatError::Configuration("API credential is not a valid header value".into()))?;
        authorization.set_sensitive(true);

        let referer = HeaderValue::from_str(self.config.referer_header())
            .map_err(|_| ChatError::Configuration("referer is not a valid header value".into()))?;
        let title = HeaderValue::from_str(self.config.app_title_header()).map_err(|_| {
            ChatError::Configuration("application title is not a valid header value".into())
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(REFERER_HEADER, referer);
        headers.insert(TITLE_HEADER, title);
        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OPENROUTER_BASE_URL;
    use unai_types::Role;

    fn config(key: &str) -> OpenRouterConfig {
        OpenRouterConfig::new(OPENROUTER_BASE_URL, key)
            .unwrap()
            .referer("https://chat.example.com")
            .app_title("Example Chat")
    }

    #[test]
    fn builds_post_to_completions_endpoint() {
        let config = config("sk-or-test");
        let request = RequestBuilder::new(&config)
            .build(&[], Message::user("hi"), "m1", false)
            .unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(
            request.endpoint,
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }

    #[test]
    fn headers_carry_credential_and_identity() {
        let config = config("sk-or-test");
        let request = RequestBuilder::new(&config)
            .build(&[], Message::user("hi"), "m1", false)
            .unwrap();
        let headers = &request.headers;
        assert_eq!(headers[AUTHORIZATION], "Bearer sk-or-test");
        assert!(headers[AUTHORIZATION].is_sensitive());
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[REFERER_HEADER], "https://chat.example.com");
        assert_eq!(headers[TITLE_HEADER], "Example Chat");
    }

    #[test]
    fn new_message_follows_history() {
        let config = config("k");
        let history = vec![Message::system("You are helpful"), Message::user("earlier")];
        let request = RequestBuilder::new(&config)
            .build(&history, Message::user("hi"), "m1", false)
            .unwrap();
        let roles: Vec<Role> = request.body.messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::User]);
        assert_eq!(request.body.messages[2].content, "hi");
        assert_eq!(request.body.model, "m1");
    }

    #[test]
    fn failed_reply_flag_is_not_sent() {
        let config = config("k");
        let history = vec![Message::user("hi"), Message::failed("Sorry")];
        let request = RequestBuilder::new(&config)
            .build(&history, Message::user("again"), "m1", false)
            .unwrap();
        assert!(request.body.messages.iter().all(|m| !m.error));

        let json = serde_json::to_value(&request.body).unwrap();
        assert_eq!(
            json["messages"][1],
            serde_json::json!({"role": "assistant", "content": "Sorry"})
        );
    }

    #[test]
    fn identity_header_names_are_canonical() {
        assert_eq!(REFERER_HEADER.as_str(), "http-referer");
        assert_eq!(TITLE_HEADER.as_str(), "x-title");
    }

    #[test]
    fn stream_flag_is_passed_through() {
        let config = config("k");
        let builder = RequestBuilder::new(&config);
        assert!(builder.build(&[], Message::user("x"), "m1", true).unwrap().is_streaming());
        assert!(!builder.build(&[], Message::user("x"), "m1", false).unwrap().is_streaming());
    }

    #[test]
    fn empty_model_falls_back_to_default() {
        let config = config("k");
        let request = RequestBuilder::new(&config)
            .build(&[], Message::user("x"), "", false)
            .unwrap();
        assert_eq!(request.body.model, DEFAULT_MODEL);
    }

    #[test]
    fn options_are_applied() {
        let config = config("k");
        let request = RequestBuilder::new(&config)
            .options(CompletionOptions {
                max_tokens: Some(1000),
                temperature: Some(0.7),
            })
            .build(&[], Message::user("x"), "m1", false)
            .unwrap();
        assert_eq!(request.body.max_tokens, Some(1000));
        assert_eq!(request.body.temperature, Some(0.7));
    }

    #[test]
    fn missing_credential_is_configuration_error() {
        let config = config("");
        let err = RequestBuilder::new(&config)
            .build(&[], Message::user("x"), "m1", false)
            .unwrap_err();
        assert!(matches!(err, ChatError::Configuration(_)));
    }

    #[test]
    fn blank_credential_is_configuration_error() {
        let config = config("   ");
        let err = RequestBuilder::new(&config)
            .build(&[], Message::user("x"), "m1", true)
            .unwrap_err();
        assert!(matches!(err, ChatError::Configuration(_)));
    }

    #[test]
    fn credential_with_newline_is_configuration_error() {
        let config = config("sk\nor");
        let err = RequestBuilder::new(&config)
            .build(&[], Message::user("x"), "m1", false)
            .unwrap_err();
        assert!(matches!(err, ChatError::Configuration(_)));
    }
}
