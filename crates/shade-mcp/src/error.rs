//! Error types for the MCP server

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for MCP operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during MCP server operations
#[derive(Debug, Error)]
pub enum Error {
    /// Error during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("failed to parse {format} config {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    /// Configuration file extension is not toml, yaml, yml or json
    #[error("unsupported config format: '{extension}'")]
    UnsupportedFormat { extension: String },

    /// Only stdio is served
    #[error("unsupported transport: '{0}' (only 'stdio' is available)")]
    UnsupportedTransport(String),

    /// A `[[tools]]` entry names a handler that does not exist
    #[error("unknown handler '{handler}' (expected add_numbers, shadow_add or run_command)")]
    UnknownHandler { handler: String },
}
