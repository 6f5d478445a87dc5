//! Server configuration
//!
//! A single file drives the server: its identity, the registration policy,
//! where the side channel writes, and which tools are registered in which
//! order. The format follows the file extension.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Serialize};
use shade_registry::DefaultPolicy;
use shade_tools::{HandlerKind, SpecOverrides};

use crate::{Error, Result};

pub const DEFAULT_SERVER_NAME: &str = "shade-mcp";
pub const DEFAULT_SIDE_CHANNEL: &str = "side_channel.log";
pub const STDIO: &str = "stdio";

/// Root of a configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ServerSection,
    pub policy: DefaultPolicy,
    pub side_channel: SideChannelSection,
    pub tools: Vec<ToolEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub name: String,
    pub transport: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoke_timeout_ms: Option<u64>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            name: DEFAULT_SERVER_NAME.to_string(),
            transport: STDIO.to_string(),
            invoke_timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SideChannelSection {
    pub path: PathBuf,
}

impl Default for SideChannelSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_SIDE_CHANNEL),
        }
    }
}

/// One `[[tools]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub handler: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steering: Option<String>,
}

impl ToolEntry {
    /// An entry that takes every text from the handler's stock spec
    pub fn stock(handler: &str) -> Self {
        Self {
            name: None,
            handler: handler.to_string(),
            description: None,
            hidden_description: None,
            steering: None,
        }
    }

    pub fn kind(&self) -> Result<HandlerKind> {
        let deserializer = self.handler.as_str().into_deserializer();
        HandlerKind::deserialize(deserializer).map_err(|_: serde::de::value::Error| {
            Error::UnknownHandler {
                handler: self.handler.clone(),
            }
        })
    }

    pub fn overrides(&self) -> SpecOverrides {
        SpecOverrides {
            name: self.name.clone(),
            description: self.description.clone(),
            hidden_payload: self.hidden_description.clone(),
            steering: self.steering.clone(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a file.
    ///
    /// Format is detected from file extension:
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        let config: Self = parse(path, extension, &content)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), tools = config.tools.len(), "Loaded config");
        Ok(config)
    }

    /// Reject settings that parse but cannot be served
    pub fn validate(&self) -> Result<()> {
        if self.server.transport != STDIO {
            return Err(Error::UnsupportedTransport(self.server.transport.clone()));
        }
        for entry in &self.tools {
            entry.kind()?;
        }
        Ok(())
    }

    pub fn invoke_timeout(&self) -> Option<Duration> {
        self.server.invoke_timeout_ms.map(Duration::from_millis)
    }

    /// Side-channel path, with a relative path taken from `base_dir`
    pub fn side_channel_path(&self, base_dir: &Path) -> PathBuf {
        if self.side_channel.path.is_absolute() {
            self.side_channel.path.clone()
        } else {
            base_dir.join(&self.side_channel.path)
        }
    }

    /// Configured tools, or the demo pair when none are listed
    pub fn tool_entries(&self) -> Vec<ToolEntry> {
        if self.tools.is_empty() {
            vec![ToolEntry::stock("add_numbers"), ToolEntry::stock("shadow_add")]
        } else {
            self.tools.clone()
        }
    }
}

fn parse<T: DeserializeOwned>(path: &Path, extension: &str, content: &str) -> Result<T> {
    match extension.to_lowercase().as_str() {
        "toml" => toml::from_str(content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            format: "TOML".into(),
            message: e.to_string(),
        }),
        "json" => serde_json::from_str(content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            format: "JSON".into(),
            message: e.to_string(),
        }),
        "yaml" | "yml" => serde_yaml::from_str(content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            format: "YAML".into(),
            message: e.to_string(),
        }),
        _ => Err(Error::UnsupportedFormat {
            extension: extension.to_string(),
        }),
    }
}
