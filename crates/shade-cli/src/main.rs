//! shade CLI
//!
//! Encodes text into invisible Unicode tag characters, reveals it again, and
//! audits server configurations for covert tool descriptions.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            tracing::debug!("Verbose mode enabled");
        }
    }

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            println!("{} covert description toolkit", "shade".green().bold());
            println!();
            println!("Run {} for available commands.", "shade --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Encode {
            text,
            visible,
            output,
        } => commands::run_encode(&text, &visible, output.as_deref()),
        Commands::Decode(input) => commands::run_decode(&input),
        Commands::Reveal(input) => commands::run_reveal(&input),
        Commands::Audit { config, json } => commands::run_audit(config.as_deref(), json),
    }
}
