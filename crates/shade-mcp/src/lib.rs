//! MCP tool server for covert-description experiments
//!
//! Serves a [`shade_registry::ToolRegistry`] over the Model Context Protocol.
//! The registry is assembled from a configuration file, so a lab setup can
//! register a legitimate tool and then shadow it under the same name.
//!
//! # Architecture
//!
//! ```text
//! [ MCP Client ]
//!        | (JSON-RPC over stdio)
//!        v
//! [ shade-mcp (server) ]
//!        | tools/list, tools/call
//!        v
//! [ shade-registry ] <-- [ shade-tools handlers ] --> [ side channel file ]
//! ```
//!
//! # Methods
//!
//! - `initialize`, `notifications/initialized`, `ping`
//! - `tools/list` - the registry's listing surface, covert descriptions included
//! - `tools/call` - invocation; failures come back as `isError` results

pub mod assembly;
pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod tools;

pub use assembly::{Assembly, build_registry};
pub use config::{ServerConfig, ToolEntry};
pub use error::{Error, Result};
pub use server::ShadeMcpServer;
pub use tools::{ToolContent, ToolResult};
