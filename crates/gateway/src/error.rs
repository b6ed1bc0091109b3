//! Gateway error normalization.
//!
//! Every failure surfaced to callers carries a human-readable message:
//! either extracted from the gateway's JSON error body or a generic
//! fallback when the body is not parseable JSON.

/// Errors from the remote job gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway returned a non-2xx status code.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Best-effort message extracted from the response body.
        message: String,
    },
}

impl GatewayError {
    /// Build an [`GatewayError::Api`] from a status code and raw body.
    pub fn api(status: u16, body: &str) -> Self {
        GatewayError::Api {
            status,
            message: extract_error_message(status, body),
        }
    }
}

/// Pull a human-readable message out of a JSON error body.
///
/// Looks for a top-level `"message"` or `"error"` string field; falls
/// back to a generic status-code message when the body is not JSON or
/// carries neither field.
pub fn extract_error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                if !msg.is_empty() {
                    return msg.to_string();
                }
            }
        }
    }
    format!("request failed with status {status}")
}
