//! Error types for calls against the StockSense server.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single request. Every variant is caught by the caller
/// and shown to the user; none of them is fatal.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (connect, timeout, reset).
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {0}")]
    Status(StatusCode),

    /// The body was not the JSON we expected.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The server answered `success: false`.
    #[error("request rejected{}", .0.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Rejected(Option<String>),
}

impl ClientError {
    /// Short label used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Network(_) => "network",
            ClientError::Status(_) => "status",
            ClientError::Decode(_) => "decode",
            ClientError::Rejected(_) => "rejected",
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Status(status)
        } else {
            ClientError::Network(err)
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        let err = ClientError::Status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "server returned 500 Internal Server Error");
        assert_eq!(err.kind(), "status");
    }

    #[test]
    fn test_rejected_message() {
        assert_eq!(ClientError::Rejected(None).to_string(), "request rejected");
        assert_eq!(
            ClientError::Rejected(Some("login required".into())).to_string(),
            "request rejected: login required"
        );
    }

    #[test]
    fn test_json_error_is_decode() {
        let err: ClientError = serde_json::from_str::<Vec<u8>>("nope").unwrap_err().into();
        assert_eq!(err.kind(), "decode");
    }
}
