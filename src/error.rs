//! Error types for the JupiterOne CLI.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Diagnostic printed when the API answers with a tree-shaped result.
pub const TREE_QUERY_MESSAGE: &str = "TREE queries are not currently supported by this CLI";

/// Main error type for CLI operations.
#[derive(Error, Debug)]
pub enum J1Error {
    /// Network errors (host unreachable, timeouts, TLS failures, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Rejected credentials (bad token, wrong account).
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Errors reported by the API itself (GraphQL errors, non-2xx responses).
    #[error("API error: {0}")]
    Api(String),

    /// Configuration errors (invalid config file, bad API URL, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failures while writing the rendered table.
    #[error("Output error: {0}")]
    Output(String),

    /// The query returned a tree-shaped result, which cannot be tabulated.
    #[error("TREE queries are not currently supported by this CLI")]
    TreeQuery,
}

impl J1Error {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates an authentication error with the given message.
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Creates an API error with the given message.
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an output error with the given message.
    pub fn output(msg: impl Into<String>) -> Self {
        Self::Output(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Auth(_) => "Authentication Error",
            Self::Api(_) => "API Error",
            Self::Config(_) => "Configuration Error",
            Self::Output(_) => "Output Error",
            Self::TreeQuery => "Unsupported Query",
        }
    }
}

impl From<std::io::Error> for J1Error {
    fn from(e: std::io::Error) -> Self {
        Self::Output(e.to_string())
    }
}

impl From<csv::Error> for J1Error {
    fn from(e: csv::Error) -> Self {
        Self::Output(e.to_string())
    }
}

/// Result type alias using J1Error.
pub type Result<T> = std::result::Result<T, J1Error>;
