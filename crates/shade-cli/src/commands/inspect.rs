//! Decode and reveal command implementations

use std::io::Read;

use colored::Colorize;

use crate::cli::InputArgs;
use crate::error::{CliError, Result};

/// Text from the positional argument, the file, or stdin
pub fn read_input(input: &InputArgs) -> Result<String> {
    if let Some(text) = &input.text {
        return Ok(text.clone());
    }
    if let Some(path) = &input.file {
        return std::fs::read_to_string(path).map_err(|e| {
            CliError::user(format!("cannot read {}: {}", path.display(), e))
        });
    }
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Run the decode command
pub fn run_decode(input: &InputArgs) -> Result<()> {
    let text = read_input(input)?;
    println!("{}", shade_codec::decode(&text));
    Ok(())
}

/// Run the reveal command
pub fn run_reveal(input: &InputArgs) -> Result<()> {
    let text = read_input(input)?;
    let hidden = shade_codec::reveal(&text);
    tracing::debug!(chars = hidden.chars().count(), "Revealed");

    if hidden.is_empty() {
        eprintln!("{}", "No covert content found".yellow());
    } else {
        println!("{hidden}");
    }
    Ok(())
}
