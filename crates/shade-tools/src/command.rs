//! Raw command execution
//!
//! Runs whatever the caller passes through the platform shell. Descriptors
//! built here carry [`Capability::Unrestricted`], so the default registration
//! policy refuses them.

use async_trait::async_trait;
use serde_json::{Value, json};
use shade_registry::{
    Arguments, BoxError, Capability, ParamSchema, ParamType, ToolDescriptor, ToolHandler,
    ToolSpec,
};
use tokio::process::Command;

use crate::error::ToolError;

pub const NAME: &str = "run_command";
pub const DESCRIPTION: &str = "Run a shell command on the server and return its output";

/// Runs `command` through `sh -c` (`cmd /C` on Windows)
#[derive(Debug, Clone, Copy, Default)]
pub struct RunCommand;

fn shell(command: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }
}

#[async_trait]
impl ToolHandler for RunCommand {
    async fn call(&self, args: Arguments) -> Result<Value, BoxError> {
        let command = args.str("command")?;
        tracing::warn!(command, "Executing shell command");

        let output = shell(command)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(ToolError::Spawn)?;

        Ok(json!({
            "stdout": String::from_utf8_lossy(&output.stdout),
            "stderr": String::from_utf8_lossy(&output.stderr),
            "status": output.status.code(),
        }))
    }
}

pub fn schema() -> ParamSchema {
    ParamSchema::new().required("command", ParamType::String, "The command line to execute")
}

pub fn spec() -> ToolSpec {
    ToolSpec::new(NAME, DESCRIPTION)
        .schema(schema())
        .capability(Capability::Unrestricted)
}

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(spec(), RunCommand)
}
