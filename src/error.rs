use thiserror::Error;

use crate::api::Operation;
use crate::api::message::{detail_message, flatten_message};

pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type Result<T> = std::result::Result<T, DynError>;

/// Errors raised while talking to the user-record API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Base URL missing, unparseable or not http(s)
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Request never produced a response (connect, timeout, TLS, ...)
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server error ({status})")]
    Status {
        status: u16,
        body: Option<serde_json::Value>,
    },

    /// Success status but the body did not have the expected shape
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text shown to the operator when `op` fails with this error.
    ///
    /// Reads and deletes report the body's `detail` field; writes flatten every
    /// value of the body. Anything else falls back to the operation's generic
    /// message.
    pub fn user_message(&self, op: Operation) -> String {
        let extracted = match self {
            ApiError::Status { body: Some(body), .. } => match op {
                Operation::Fetch | Operation::Delete => detail_message(body),
                Operation::Add | Operation::Update => flatten_message(body),
            },
            _ => None,
        };
        extracted.unwrap_or_else(|| op.fallback_message().to_string())
    }
}
