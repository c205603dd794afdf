//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and provide
//! clear error messages with context.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the Errata MCP server.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed caller input (empty or non-numeric identifiers, bad arguments).
    #[error("{0}")]
    Validation(String),

    /// Unknown advisory or product (HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Credential or permission rejection from the Errata Tool (HTTP 401/403).
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Operation the Errata Tool API cannot serve.
    #[error("{0}")]
    Unsupported(String),

    /// Per-call network timeout elapsed.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Any other non-success response from the Errata Tool.
    #[error("remote error: {0}")]
    Remote(String),

    /// Invalid startup configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport-level HTTP client errors.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// JSON-RPC error code used when an error escapes to the protocol layer.
    ///
    /// Tool failures never take this path; they are reported inside the
    /// tool's status envelope.
    pub fn to_jsonrpc_code(&self) -> i32 {
        match self {
            Error::Validation(_) => -32602,
            Error::NotFound(_) => -32602,
            Error::Serialization(_) => -32700,
            _ => -32603,
        }
    }

    /// True when the error was caused by the caller's input rather than the remote service.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

// Convenience constructors
impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn authentication(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    pub fn remote(msg: impl Into<String>) -> Self {
        Self::Remote(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_is_bare() {
        let err = Error::validation("advisory_id is required");
        assert_eq!(err.to_string(), "advisory_id is required");
        assert!(err.is_invalid_input());
    }

    #[test]
    fn remote_errors_are_not_invalid_input() {
        assert!(!Error::not_found("erratum 1").is_invalid_input());
        assert!(!Error::authentication("401 Unauthorized").is_invalid_input());
    }

    #[test]
    fn jsonrpc_codes() {
        assert_eq!(Error::validation("x").to_jsonrpc_code(), -32602);
        assert_eq!(Error::remote("x").to_jsonrpc_code(), -32603);
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(Error::from(parse).to_jsonrpc_code(), -32700);
    }
}
