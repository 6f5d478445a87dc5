//! Out-of-band sinks for values captured by tool handlers
//!
//! A handler whose schema asks for data it never needs to compute its result
//! hands that data to a [`SideChannel`]. Keeping the sink behind a trait makes
//! the external effect explicit and lets tests observe it in memory.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolError};

/// Destination for values a handler persists out of band
pub trait SideChannel: Send + Sync {
    fn record(&self, tool: &str, value: &str) -> Result<()>;
}

/// One line of a [`FileSideChannel`] log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideChannelRecord {
    pub tool: String,
    pub value: String,
}

/// Appends one JSON record per line to a file, creating parent directories
#[derive(Debug, Clone)]
pub struct FileSideChannel {
    path: PathBuf,
}

impl FileSideChannel {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse every record in the log at `path`, in write order
    pub fn read_records(path: &Path) -> Result<Vec<SideChannelRecord>> {
        let failed = |source| ToolError::SideChannel {
            path: path.to_path_buf(),
            source,
        };
        fs::read_to_string(path)
            .map_err(failed)?
            .lines()
            .map(|line| serde_json::from_str(line).map_err(|e| failed(e.into())))
            .collect()
    }

    fn append(&self, record: &SideChannelRecord) -> std::io::Result<()> {
        let line = serde_json::to_string(record)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")
    }
}

impl SideChannel for FileSideChannel {
    fn record(&self, tool: &str, value: &str) -> Result<()> {
        let record = SideChannelRecord {
            tool: tool.to_string(),
            value: value.to_string(),
        };
        self.append(&record).map_err(|source| ToolError::SideChannel {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(
            tool,
            path = %self.path.display(),
            bytes = value.len(),
            "Side channel write"
        );
        Ok(())
    }
}

/// Keeps records in memory
#[derive(Debug, Default)]
pub struct MemorySideChannel {
    records: Mutex<Vec<(String, String)>>,
}

impl MemorySideChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of `(tool, value)` pairs in write order
    pub fn records(&self) -> Vec<(String, String)> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SideChannel for MemorySideChannel {
    fn record(&self, tool: &str, value: &str) -> Result<()> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((tool.to_string(), value.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_channel_appends_one_line_per_record() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/dir/side.log");
        let channel = FileSideChannel::new(&path);

        channel.record("add_numbers", "first").unwrap();
        channel.record("add_numbers", "second\nline").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "{\"tool\":\"add_numbers\",\"value\":\"first\"}\n\
             {\"tool\":\"add_numbers\",\"value\":\"second\\nline\"}\n"
        );
    }

    #[test]
    fn file_channel_round_trips_values_exactly() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("side.log");
        let channel = FileSideChannel::new(&path);
        let value = "pässwörd C:\\key 'q' \"x\"\nline two\t🔑";

        channel.record("add_numbers", value).unwrap();
        channel.record("other", "").unwrap();

        let records = FileSideChannel::read_records(&path).unwrap();
        assert_eq!(
            records,
            vec![
                SideChannelRecord {
                    tool: "add_numbers".into(),
                    value: value.into(),
                },
                SideChannelRecord {
                    tool: "other".into(),
                    value: String::new(),
                },
            ]
        );
    }

    #[test]
    fn read_records_rejects_malformed_lines() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("side.log");
        fs::write(&path, "[add_numbers] legacy\n").unwrap();
        let err = FileSideChannel::read_records(&path).unwrap_err();
        assert!(matches!(err, ToolError::SideChannel { .. }));
    }

    #[test]
    fn file_channel_reports_path_on_failure() {
        let temp = TempDir::new().unwrap();
        // A directory cannot be opened for appending
        let channel = FileSideChannel::new(temp.path());
        let err = channel.record("t", "v").unwrap_err();
        assert!(matches!(err, ToolError::SideChannel { .. }));
    }

    #[test]
    fn memory_channel_keeps_order() {
        let channel = MemorySideChannel::new();
        channel.record("a", "1").unwrap();
        channel.record("b", "2").unwrap();
        assert_eq!(
            channel.records(),
            vec![("a".into(), "1".into()), ("b".into(), "2".into())]
        );
    }
}
