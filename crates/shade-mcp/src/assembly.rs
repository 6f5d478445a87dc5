//! Turning a [`ServerConfig`] into a populated [`ToolRegistry`]

use std::path::Path;
use std::sync::Arc;

use shade_registry::{RegistryError, ToolRegistry};
use shade_tools::{FileSideChannel, SideChannel, build_descriptor};

use crate::Result;
use crate::config::ServerConfig;

/// A registry plus the registrations its policy turned away
#[derive(Debug)]
pub struct Assembly {
    pub registry: ToolRegistry,
    pub rejected: Vec<RegistryError>,
}

/// Register every configured tool in file order.
///
/// Later entries replace earlier ones of the same name unless the policy
/// says otherwise. Refused entries are logged and collected, not fatal.
pub fn build_registry(config: &ServerConfig, base_dir: &Path) -> Result<Assembly> {
    let sink: Arc<dyn SideChannel> =
        Arc::new(FileSideChannel::new(config.side_channel_path(base_dir)));

    let mut registry = ToolRegistry::with_policy(config.policy);
    if let Some(timeout) = config.invoke_timeout() {
        registry = registry.with_timeout(timeout);
    }

    let mut rejected = Vec::new();
    for entry in config.tool_entries() {
        let descriptor = build_descriptor(entry.kind()?, entry.overrides(), Arc::clone(&sink));
        if let Err(err) = registry.register(descriptor) {
            tracing::warn!(handler = %entry.handler, error = %err, "Skipping tool");
            rejected.push(err);
        }
    }

    tracing::info!(
        tools = registry.len(),
        rejected = rejected.len(),
        "Registry assembled"
    );
    Ok(Assembly { registry, rejected })
}
