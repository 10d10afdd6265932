//! Failures talking to the queue service

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Why a poll or update against the queue service did not succeed
///
/// Only the transport and status variants are worth retrying; a task the
/// service sent back that cannot be decoded will not decode on a second try.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The queue service could not be reached or the connection dropped
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The queue service answered with a non-success status
    #[error("API error (status {status}): {message}")]
    ApiError {
        status: u16,
        /// Response body as the service sent it
        message: String,
    },

    /// A polled task was not valid task JSON
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Rejected before sending, e.g. an empty or unaddressable task type
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ClientError::api_error(503, "queue unavailable");
        assert_eq!(err.to_string(), "API error (status 503): queue unavailable");
    }

    #[test]
    fn test_rejected_task_type_display() {
        let err = ClientError::InvalidRequest("task type cannot be empty".to_string());
        assert_eq!(err.to_string(), "Invalid request: task type cannot be empty");
    }
}
