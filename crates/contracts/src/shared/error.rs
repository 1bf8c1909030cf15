use super::http::HttpResponse;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The server answered with a non-2xx status. `message` is the body.
    #[error("request rejected with status {status}: {message}")]
    RequestRejected { status: u16, message: String },

    /// No response arrived (connectivity loss, aborted fetch, unreadable body).
    #[error("network error: {0}")]
    Network(String),

    /// The page does not carry what the operation needs; nothing was sent.
    #[error("missing context: {0}")]
    MissingContext(String),
}

impl SyncError {
    pub fn rejected(response: &HttpResponse) -> Self {
        SyncError::RequestRejected {
            status: response.status,
            message: response.body.clone(),
        }
    }

    pub fn missing(what: impl Into<String>) -> Self {
        SyncError::MissingContext(what.into())
    }

    pub fn is_rejection(&self) -> bool {
        matches!(self, SyncError::RequestRejected { .. })
    }

    /// Text shown to the user. Server messages are passed through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            SyncError::RequestRejected { status, message } => {
                if message.trim().is_empty() {
                    format!("Request failed with status {}", status)
                } else {
                    message.clone()
                }
            }
            SyncError::Network(detail) => format!("Network error: {}", detail),
            SyncError::MissingContext(what) => format!("Cannot sync: {}", what),
        }
    }
}
