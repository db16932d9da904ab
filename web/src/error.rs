//! Errors an action can return instead of a reply.

use http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WebError {
    /// The action rejected the request with a specific status.
    #[error("{status}: {message}")]
    Status { status: StatusCode, message: String },

    /// Anything else that went wrong while handling the request.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WebError {
    /// Status code the error is rendered with.
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::Status { status, .. } => *status,
            WebError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
