//! Unified error types for coverfind.
//!
//! The first five variants are the failure kinds a cover source can hit on the
//! wire. They never escape a strategy or batch item; the remaining variants
//! describe caller mistakes and local storage problems.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Unified error type shared by every coverfind crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// DNS or connection failure.
    #[error("NETWORK_ERROR: {0}")]
    Network(String),

    /// Bounded wait exceeded.
    #[error("TIMEOUT: {0}")]
    Timeout(String),

    /// Non-200 status that was not a followed redirect.
    #[error("HTTP_STATUS: {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// Malformed response body.
    #[error("PARSE_ERROR: {0}")]
    Parse(String),

    /// Candidate URL did not resolve to an image.
    #[error("VALIDATION_ERROR: {0}")]
    Validation(String),

    /// URL could not be parsed or uses an unsupported scheme.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Invalid input parameters (e.g., an empty title).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Covers directory could not be created, read or written.
    #[error("STORAGE_ERROR: {0}")]
    Storage(String),
}

impl Error {
    /// Whether this error came from talking to a remote host.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Error::Network(_) | Error::Timeout(_) | Error::HttpStatus { .. } | Error::Parse(_) | Error::Validation(_)
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidInput(_) => -32602,
            Error::Network(_) => -32001,
            Error::Timeout(_) => -32002,
            Error::HttpStatus { .. } => -32003,
            Error::Parse(_) => -32004,
            Error::Validation(_) => -32005,
            Error::InvalidUrl(_) => -32006,
            Error::Storage(_) => -32007,
        };

        McpError { code: ErrorCode(code), message: err.to_string().into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::HttpStatus { status: 500, url: "https://example.com".to_string() };
        assert!(err.to_string().contains("HTTP_STATUS"));
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_remote_classification() {
        assert!(Error::Timeout("slow".into()).is_remote());
        assert!(Error::Validation("text/html".into()).is_remote());
        assert!(!Error::Storage("disk full".into()).is_remote());
        assert!(!Error::InvalidInput("empty".into()).is_remote());
    }

    #[test]
    fn test_io_error_is_storage() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, Error::Storage(_)));
    }

    #[test]
    fn test_error_to_mcp_error() {
        let err = Error::InvalidInput("title cannot be empty".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32602);
        assert!(mcp_err.message.contains("title cannot be empty"));
    }
}
