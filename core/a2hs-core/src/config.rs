//! Controller configuration.
//!
//! The two presentation variants (timed fallback vs. manual instructions on
//! demand) are one controller with different settings. Loaded from
//! `~/.a2hs/config.toml`; a missing file yields defaults.
//!
//! ```toml
//! fallback_mode = "timed"
//! fallback_timeout_ms = 3000
//! dismissal_scope = "permanent"
//! diagnostic_timeout_ms = 5000
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{A2hsError, Result};
use crate::storage::StorageConfig;

pub const DEFAULT_FALLBACK_TIMEOUT_MS: u64 = 3000;
pub const DEFAULT_DIAGNOSTIC_TIMEOUT_MS: u64 = 5000;

/// Lifetime of a dismissal record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DismissalScope {
    /// Cleared when the browsing session ends.
    Session,
    /// Kept until explicitly cleared.
    #[default]
    Permanent,
}

impl DismissalScope {
    pub const ALL: [DismissalScope; 2] = [DismissalScope::Session, DismissalScope::Permanent];

    /// Fixed storage key for this scope.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Session => "a2hs-dismissed-session",
            Self::Permanent => "a2hs-dismissed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::Permanent => "permanent",
        }
    }
}

impl fmt::Display for DismissalScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DismissalScope {
    type Err = A2hsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "session" => Ok(Self::Session),
            "permanent" => Ok(Self::Permanent),
            other => Err(A2hsError::UnknownScope(other.to_string())),
        }
    }
}

/// How the controller reaches manual instructions when no native signal exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FallbackMode {
    /// Arm a timer; on expiry move to `fallbackAvailable`.
    #[default]
    Timed,
    /// Wait for the signal indefinitely; `trigger()` shows instructions on demand.
    OnDemand,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptConfig {
    #[serde(default)]
    pub fallback_mode: FallbackMode,
    #[serde(default = "default_fallback_timeout_ms")]
    pub fallback_timeout_ms: u64,
    #[serde(default)]
    pub dismissal_scope: DismissalScope,
    #[serde(default = "default_diagnostic_timeout_ms")]
    pub diagnostic_timeout_ms: u64,
}

fn default_fallback_timeout_ms() -> u64 {
    DEFAULT_FALLBACK_TIMEOUT_MS
}

fn default_diagnostic_timeout_ms() -> u64 {
    DEFAULT_DIAGNOSTIC_TIMEOUT_MS
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            fallback_mode: FallbackMode::default(),
            fallback_timeout_ms: DEFAULT_FALLBACK_TIMEOUT_MS,
            dismissal_scope: DismissalScope::default(),
            diagnostic_timeout_ms: DEFAULT_DIAGNOSTIC_TIMEOUT_MS,
        }
    }
}

impl PromptConfig {
    /// Timed fallback after `timeout_ms`.
    pub fn timed(timeout_ms: u64) -> Self {
        Self {
            fallback_mode: FallbackMode::Timed,
            fallback_timeout_ms: timeout_ms,
            ..Self::default()
        }
    }

    /// Wait indefinitely, manual instructions on demand.
    pub fn on_demand() -> Self {
        Self {
            fallback_mode: FallbackMode::OnDemand,
            ..Self::default()
        }
    }

    pub fn with_scope(mut self, scope: DismissalScope) -> Self {
        self.dismissal_scope = scope;
        self
    }

    /// Timer duration, or `None` when the on-demand variant is configured.
    pub fn fallback_timeout(&self) -> Option<Duration> {
        match self.fallback_mode {
            FallbackMode::Timed => Some(Duration::from_millis(self.fallback_timeout_ms)),
            FallbackMode::OnDemand => None,
        }
    }

    pub fn diagnostic_timeout(&self) -> Duration {
        Duration::from_millis(self.diagnostic_timeout_ms)
    }
}

/// Returns the path to the default configuration file.
pub fn default_config_path() -> PathBuf {
    StorageConfig::default().config_file()
}

/// Loads controller configuration, returning defaults if the file doesn't exist.
pub fn load_prompt_config(path: Option<PathBuf>) -> Result<PromptConfig> {
    let config_path = path.unwrap_or_else(default_config_path);

    if !config_path.exists() {
        return Ok(PromptConfig::default());
    }

    let content = fs_err::read_to_string(&config_path).map_err(|err| A2hsError::ConfigMalformed {
        path: config_path.clone(),
        details: err.to_string(),
    })?;
    toml::from_str::<PromptConfig>(&content).map_err(|err| A2hsError::ConfigMalformed {
        path: config_path,
        details: err.to_string(),
    })
}
