//! Encode command implementation

use std::io::Write;
use std::path::Path;

use colored::Colorize;

use crate::error::Result;

/// Character counts of an encoding run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSummary {
    /// Visible prefix plus plaintext, in code points
    pub before: usize,
    /// Visible prefix plus payload, in code points
    pub after: usize,
    /// Plaintext characters that could not be encoded
    pub dropped: usize,
}

/// Compose `visible` followed by `text` in tag characters
pub fn compose(text: &str, visible: &str) -> (String, EncodeSummary) {
    let payload = shade_codec::encode(text);
    let visible_len = visible.chars().count();
    let plain_len = text.chars().count();

    let summary = EncodeSummary {
        before: visible_len + plain_len,
        after: visible_len + payload.len(),
        dropped: plain_len - payload.len(),
    };

    let mut composed = String::with_capacity(visible.len() + payload.as_str().len());
    composed.push_str(visible);
    composed.push_str(payload.as_str());
    (composed, summary)
}

/// Run the encode command
pub fn run_encode(text: &str, visible: &str, output: Option<&Path>) -> Result<()> {
    let (composed, summary) = compose(text, visible);
    tracing::debug!(?summary, "Encoded");

    match output {
        Some(path) => {
            std::fs::write(path, &composed)?;
            println!(
                "{} hidden text written to {}",
                "✓".green(),
                path.display().to_string().cyan()
            );
            print_summary(&mut std::io::stdout(), summary)?;
        }
        None => {
            // stdout carries only the composed text so it can be piped
            let mut stdout = std::io::stdout();
            writeln!(stdout, "{composed}")?;
            print_summary(&mut std::io::stderr(), summary)?;
        }
    }
    Ok(())
}

fn print_summary(out: &mut impl Write, summary: EncodeSummary) -> Result<()> {
    writeln!(
        out,
        "{}: {} → {}",
        "Character count".dimmed(),
        summary.before,
        summary.after
    )?;
    if summary.dropped > 0 {
        writeln!(
            out,
            "{} {} non-ASCII character(s) dropped",
            "warning:".yellow().bold(),
            summary.dropped
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn composes_visible_then_hidden() {
        let (composed, summary) = compose("Hi", "Add");
        assert_eq!(shade_codec::strip(&composed), "Add");
        assert_eq!(shade_codec::reveal(&composed), "Hi");
        assert_eq!(
            summary,
            EncodeSummary {
                before: 5,
                after: 5,
                dropped: 0
            }
        );
    }

    #[test]
    fn counts_dropped_characters() {
        let (composed, summary) = compose("café", "");
        assert_eq!(shade_codec::decode(&composed), "caf");
        assert_eq!(summary.dropped, 1);
        assert_eq!(summary.after, 3);
    }
}
