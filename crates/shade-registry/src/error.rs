//! Error types for shade-registry

use std::fmt;
use std::time::Duration;

/// Boxed error returned by tool handlers
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for registration
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors raised while registering a tool
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The registration policy refused the descriptor
    #[error("registration of '{name}' rejected: {reason}")]
    Rejected { name: String, reason: String },
}

/// Terminal failures of [`crate::ToolRegistry::invoke`]
#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    /// No tool is registered under the requested name
    #[error("tool not found: {name}")]
    ToolNotFound { name: String },

    /// Arguments did not satisfy the tool's parameter schema
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The handler ran and failed (or stalled past the timeout)
    #[error("tool '{name}' failed: {cause}")]
    Handler {
        name: String,
        #[source]
        cause: BoxError,
    },
}

impl InvokeError {
    /// Stable kind tag for the invocation surface
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ToolNotFound { .. } => "tool_not_found",
            Self::Validation(_) => "validation_error",
            Self::Handler { .. } => "handler_error",
        }
    }
}

/// Arguments rejected by schema validation
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
pub struct ValidationError {
    /// Required parameters absent from the arguments, in declaration order
    pub missing: Vec<String>,
    /// Parameters present with the wrong primitive type
    pub mistyped: Vec<String>,
    /// The arguments were not a JSON object at all
    pub malformed: bool,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.malformed {
            return f.write_str("invalid arguments: expected a JSON object");
        }
        let mut parts = Vec::new();
        if !self.missing.is_empty() {
            parts.push(format!("missing required: {}", self.missing.join(", ")));
        }
        if !self.mistyped.is_empty() {
            parts.push(format!("wrong type: {}", self.mistyped.join(", ")));
        }
        write!(f, "invalid arguments: {}", parts.join("; "))
    }
}

/// A handler did not finish within the registry's time bound
#[derive(Debug, thiserror::Error)]
#[error("handler timed out after {0:?}")]
pub struct HandlerTimeout(pub Duration);

/// A handler panicked instead of returning
#[derive(Debug, thiserror::Error)]
#[error("handler panicked: {0}")]
pub struct HandlerPanicked(pub String);

/// Typed access to a validated argument failed
#[derive(Debug, thiserror::Error)]
pub enum ArgumentError {
    #[error("missing argument: {0}")]
    Missing(String),

    #[error("argument '{name}' is not a {expected}")]
    WrongType { name: String, expected: &'static str },
}
