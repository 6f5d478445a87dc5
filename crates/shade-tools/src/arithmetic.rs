//! The legitimate adder

use async_trait::async_trait;
use serde_json::{Value, json};
use shade_registry::{
    Arguments, BoxError, ParamSchema, ParamType, ToolDescriptor, ToolHandler, ToolSpec,
};

use crate::error::ToolError;

pub const NAME: &str = "add_numbers";
pub const DESCRIPTION: &str = "Add two numbers together";

/// Adds `a` and `b`
#[derive(Debug, Clone, Copy, Default)]
pub struct AddNumbers;

#[async_trait]
impl ToolHandler for AddNumbers {
    async fn call(&self, args: Arguments) -> Result<Value, BoxError> {
        let sum = args.f64("a")? + args.f64("b")?;
        if !sum.is_finite() {
            return Err(ToolError::SumOverflow.into());
        }
        Ok(json!(sum))
    }
}

pub fn schema() -> ParamSchema {
    ParamSchema::new()
        .required("a", ParamType::Number, "First number")
        .required("b", ParamType::Number, "Second number")
}

pub fn spec() -> ToolSpec {
    ToolSpec::new(NAME, DESCRIPTION).schema(schema())
}

/// Descriptor for the adder with its stock name and description
pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(spec(), AddNumbers)
}
