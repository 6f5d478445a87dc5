//! Audit command implementation
//!
//! Builds the registry exactly as the server would and reports what a client
//! listing it would receive, separating the visible and hidden channels.

use std::path::{Path, PathBuf};

use colored::Colorize;
use serde::Serialize;
use shade_mcp::{Assembly, ServerConfig, build_registry};
use shade_registry::Capability;

use crate::error::Result;

/// One listed tool as seen by the audit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    pub name: String,
    pub visible: String,
    pub covert: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revealed: Option<String>,
    pub capability: Capability,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub tools: Vec<AuditEntry>,
    pub rejected: Vec<String>,
}

impl AuditReport {
    pub fn from_assembly(assembly: &Assembly) -> Self {
        let tools = assembly
            .registry
            .names()
            .into_iter()
            .filter_map(|name| assembly.registry.get(&name))
            .map(|descriptor| {
                let rendered = descriptor.rendered_description();
                let covert = shade_codec::contains_covert(rendered);
                AuditEntry {
                    name: descriptor.name().to_string(),
                    visible: shade_codec::strip(rendered),
                    covert,
                    revealed: covert.then(|| shade_codec::reveal(rendered)),
                    capability: descriptor.capability(),
                }
            })
            .collect();

        Self {
            tools,
            rejected: assembly.rejected.iter().map(ToString::to_string).collect(),
        }
    }

    pub fn covert_count(&self) -> usize {
        self.tools.iter().filter(|t| t.covert).count()
    }
}

fn load(config: Option<&Path>) -> Result<Assembly> {
    let assembly = match config {
        Some(path) => {
            let base = path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            build_registry(&ServerConfig::load(path)?, &base)?
        }
        None => build_registry(&ServerConfig::default(), Path::new("."))?,
    };
    Ok(assembly)
}

/// Run the audit command
pub fn run_audit(config: Option<&Path>, json: bool) -> Result<()> {
    let report = AuditReport::from_assembly(&load(config)?);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Tool Audit".bold());
    println!();

    for tool in &report.tools {
        let marker = if tool.covert {
            "!".red().bold()
        } else {
            "+".green()
        };
        println!("  {} {}", marker, tool.name.cyan());
        println!("    {}: {}", "Visible".dimmed(), tool.visible);
        if let Some(revealed) = &tool.revealed {
            println!("    {}:  {}", "Hidden".red(), revealed);
        }
        if tool.capability == Capability::Unrestricted {
            println!("    {}", "unrestricted capability".yellow());
        }
    }

    if !report.rejected.is_empty() {
        println!();
        println!("{}:", "Rejected".bold());
        for reason in &report.rejected {
            println!("  {} {}", "-".yellow(), reason);
        }
    }

    println!();
    let covert = report.covert_count();
    if covert == 0 {
        println!("{}", "No covert descriptions found".green());
    } else {
        println!(
            "{}",
            format!("{} tool(s) carry covert descriptions", covert)
                .red()
                .bold()
        );
    }
    Ok(())
}
