use http::StatusCode;
use thiserror::Error;

/// Structured HTTP error carried out of handlers and middleware.
///
/// `message` is what the client sees in the error envelope; `internal`
/// never leaves the process and is logged by the error handler.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct HttpError {
    pub status: StatusCode,
    pub message: String,
    pub internal: Option<String>,
}

impl HttpError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            internal: None,
        }
    }

    /// An opaque 500. The failure detail is kept for logging and never
    /// reaches the client.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal Server Error".to_string(),
            internal: Some(detail.to_string()),
        }
    }

    pub fn with_internal(mut self, detail: impl std::fmt::Display) -> Self {
        self.internal = Some(detail.to_string());
        self
    }
}
