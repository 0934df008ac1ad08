//! Errors raised while talking to the platform backend.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure: connection refused, timeout, body read error
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Backend returned {status} for {url}")]
    Status { status: u16, url: String },

    /// Response body did not match the expected shape
    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    /// The task running the request panicked or was cancelled
    #[error("Backend request aborted: {0}")]
    Aborted(String),
}

impl ClientError {
    /// HTTP status of a non-success response, if that is what failed.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Request(e) => e.status().map(|s| s.as_u16()),
            ClientError::Parse(_) | ClientError::InvalidUrl(_) | ClientError::Aborted(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_expose_their_code() {
        let err = ClientError::Status {
            status: 404,
            url: "http://backend/admin/users/ghost".to_string(),
        };
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn parse_errors_have_no_status() {
        let err = ClientError::Parse("expected value".to_string());
        assert_eq!(err.status(), None);
        assert!(!err.is_not_found());
    }
}
