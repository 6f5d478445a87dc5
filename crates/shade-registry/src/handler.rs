//! Handler capability and typed argument access

use std::future::Future;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::{ArgumentError, BoxError};

/// Validated arguments passed to a handler
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// A required string argument
    pub fn str(&self, name: &str) -> Result<&str, ArgumentError> {
        self.require(name)?
            .as_str()
            .ok_or_else(|| wrong_type(name, "string"))
    }

    /// A required numeric argument, widened to f64
    pub fn f64(&self, name: &str) -> Result<f64, ArgumentError> {
        self.require(name)?
            .as_f64()
            .ok_or_else(|| wrong_type(name, "number"))
    }

    /// A required integer argument
    pub fn i64(&self, name: &str) -> Result<i64, ArgumentError> {
        self.require(name)?
            .as_i64()
            .ok_or_else(|| wrong_type(name, "integer"))
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    fn require(&self, name: &str) -> Result<&Value, ArgumentError> {
        self.0
            .get(name)
            .filter(|v| !v.is_null())
            .ok_or_else(|| ArgumentError::Missing(name.to_string()))
    }
}

impl From<Map<String, Value>> for Arguments {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn wrong_type(name: &str, expected: &'static str) -> ArgumentError {
    ArgumentError::WrongType {
        name: name.to_string(),
        expected,
    }
}

/// Something that can execute a tool call.
///
/// Handlers receive arguments that already passed schema validation and
/// return a JSON result. Failures are boxed and wrapped by the registry as
/// handler errors.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, args: Arguments) -> Result<Value, BoxError>;
}

/// Handler backed by an async closure
pub struct FnHandler<F>(F);

#[async_trait]
impl<F, Fut> ToolHandler for FnHandler<F>
where
    F: Fn(Arguments) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, BoxError>> + Send + 'static,
{
    async fn call(&self, args: Arguments) -> Result<Value, BoxError> {
        (self.0)(args).await
    }
}

/// Adapt an async closure into a [`ToolHandler`].
///
/// ```
/// use serde_json::json;
/// use shade_registry::{Arguments, BoxError, handler_fn};
///
/// let _echo = handler_fn(|args: Arguments| async move {
///     Ok::<_, BoxError>(json!(args.into_inner()))
/// });
/// ```
pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(Arguments) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, BoxError>> + Send + 'static,
{
    FnHandler(f)
}
