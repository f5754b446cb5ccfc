//! Storage configuration and path management for a2hs.
//!
//! Production code uses `StorageConfig::default()` which points to `~/.a2hs/`.
//! Tests use `StorageConfig::with_root(temp_dir)` for isolation.

use std::path::{Path, PathBuf};

/// Central configuration for all a2hs storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory for all a2hs data (default: ~/.a2hs)
    root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        // No home directory (sandboxed runners): fall back to the temp dir so the
        // permanent scope still has somewhere to live for the process.
        let base = dirs::home_dir().unwrap_or_else(std::env::temp_dir);
        Self {
            root: base.join(".a2hs"),
        }
    }
}

impl StorageConfig {
    /// Creates a StorageConfig with a custom root directory.
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    /// Returns the root directory for a2hs data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to dismissals.json (permanent dismissal records).
    pub fn dismissals_file(&self) -> PathBuf {
        self.root.join("dismissals.json")
    }

    /// Path to config.toml (controller configuration).
    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// Path to logs/ directory (CLI rolling logs).
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }
}
