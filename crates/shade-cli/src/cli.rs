//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Encode, inspect and audit covert text in tool descriptions
#[derive(Parser, Debug)]
#[command(name = "shade")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Hide ASCII text in invisible Unicode tag characters
    ///
    /// Non-ASCII characters cannot be represented and are dropped.
    ///
    /// Examples:
    ///   shade encode "secret"                          # invisible text on stdout
    ///   shade encode "secret" --visible "Add numbers"  # prefix with visible text
    ///   shade encode "secret" -o description.txt       # write to a file
    Encode {
        /// Text to hide
        text: String,

        /// Visible text placed before the hidden part
        #[arg(long, default_value = "")]
        visible: String,

        /// Write the result to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print text with every tag character turned back into ASCII
    Decode(InputArgs),

    /// Print only the hidden content of the text
    Reveal(InputArgs),

    /// List the tools a config would serve and flag covert descriptions
    ///
    /// Without --config the built-in demo set is audited.
    Audit {
        /// Server configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

/// Where decode and reveal read from; stdin when neither is given
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct InputArgs {
    /// Text to inspect
    #[arg(conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the text from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}
