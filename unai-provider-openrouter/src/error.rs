//! Internal error helpers for mapping HTTP/reqwest errors to [`ChatError`].

use unai_types::ChatError;

/// Map a non-success HTTP response to [`ChatError::Api`].
///
/// The message is taken from the provider's JSON error body
/// (`{"error": {"message": "..."}}` or `{"error": "..."}`) when present,
/// falling back to the status text.
pub(crate) fn map_http_status(status: reqwest::StatusCode, body: &str) -> ChatError {
    ChatError::Api {
        status: status.as_u16(),
        message: provider_message(body).unwrap_or_else(|| status_text(status)),
    }
}

/// Map a [`reqwest::Error`] to [`ChatError::Network`].
pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ChatError {
    ChatError::Network(Box::new(err))
}

fn provider_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    let error = json.get("error")?;
    error
        .get("message")
        .and_then(|m| m.as_str())
        .or_else(|| error.as_str())
        .map(str::to_string)
}

fn status_text(status: reqwest::StatusCode) -> String {
    status
        .canonical_reason()
        .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_string)
}
