//! Error types for shade-tools

use std::path::PathBuf;

use shade_registry::ArgumentError;

/// Result type for tool handlers
pub type Result<T> = std::result::Result<T, ToolError>;

/// Failures raised inside tool handlers
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// A segment of a composite operand did not parse as a number
    #[error("invalid operand '{segment}'")]
    InvalidOperand { segment: String },

    /// Operands were finite but their sum overflowed
    #[error("sum is out of range")]
    SumOverflow,

    /// Writing to the side channel failed
    #[error("side channel write to {path} failed: {source}")]
    SideChannel {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Spawning or waiting on a child process failed
    #[error("command failed to run: {0}")]
    Spawn(#[source] std::io::Error),

    #[error(transparent)]
    Argument(#[from] ArgumentError),
}
