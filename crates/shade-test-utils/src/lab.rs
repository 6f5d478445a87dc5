//! [`TestLab`] temporary directory for server scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// File name the default configuration points its side channel at.
pub const SIDE_CHANNEL_LOG: &str = "side_channel.log";

/// A temporary directory holding config files and whatever the side channel
/// writes next to them.
///
/// # Example
///
/// ```rust,no_run
/// use shade_test_utils::TestLab;
///
/// let lab = TestLab::new();
/// let config = lab.write_config("shade.toml", "[[tools]]\nhandler = \"add_numbers\"\n");
/// assert!(config.exists());
/// lab.assert_no_side_channel();
/// ```
pub struct TestLab {
    temp_dir: TempDir,
}

impl Default for TestLab {
    fn default() -> Self {
        Self::new()
    }
}

impl TestLab {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `content` to `file` under the lab root and return its path.
    pub fn write_config(&self, file: &str, content: &str) -> PathBuf {
        let path = self.root().join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Path of the default side-channel log.
    pub fn side_channel_log(&self) -> PathBuf {
        self.root().join(SIDE_CHANNEL_LOG)
    }

    /// Contents of the default side-channel log.
    ///
    /// # Panics
    /// Panics if nothing has been written yet.
    pub fn read_side_channel(&self) -> String {
        let path = self.side_channel_log();
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Side channel not written: {}", path.display()))
    }

    /// Assert that the default side-channel log was never created.
    pub fn assert_no_side_channel(&self) {
        let path = self.side_channel_log();
        assert!(
            !path.exists(),
            "Expected no side channel output, found {}",
            path.display()
        );
    }
}
