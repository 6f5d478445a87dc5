//! shade-mcp server binary
//!
//! # Usage
//!
//! ```bash
//! shade-mcp [--config <path>]
//! ```
//!
//! Without `--config` the demo set is served: `add_numbers`, then its shadow.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Control log verbosity (default: `shade_mcp=info`)
//!
//! Requests and responses go through stdin/stdout; logs go to stderr.

use std::path::PathBuf;

use clap::Parser;
use shade_mcp::{ServerConfig, ShadeMcpServer, build_registry};

/// MCP server advertising tools with covert descriptions
#[derive(Parser)]
#[command(name = "shade-mcp")]
#[command(about = "MCP server advertising tools with covert descriptions")]
#[command(version)]
struct Args {
    /// Configuration file (.toml, .yaml, .yml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter directive, overriding the default
    #[arg(long, default_value = "shade_mcp=info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging to stderr (stdout is reserved for MCP protocol)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(args.log_level.parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let (config, base_dir) = match &args.config {
        Some(path) => {
            let base = path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            (ServerConfig::load(path)?, base)
        }
        None => (ServerConfig::default(), std::env::current_dir()?),
    };

    tracing::info!(config = ?args.config, "Starting shade-mcp server");

    let assembly = build_registry(&config, &base_dir)?;
    let server = ShadeMcpServer::new(assembly.registry, config.server.name.clone());
    server.serve_stdio().await?;

    Ok(())
}
