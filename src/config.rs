//! Highlighter configuration persistence
//!
//! Stores user preferences in `~/.config/rebel-highlight/config.yaml`

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::scheduler::{SchedulerSettings, DEFAULT_BATCH_SIZE, DEFAULT_TIME_BUDGET};
use crate::syntax::LanguageId;

/// Highlighter configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightConfig {
    /// Max blocks rehighlighted per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Max milliseconds spent per batch
    #[serde(default = "default_time_budget_ms")]
    pub time_budget_ms: u64,
    /// Language used when a file's extension isn't recognized
    #[serde(default)]
    pub default_language: LanguageId,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_time_budget_ms() -> u64 {
    DEFAULT_TIME_BUDGET.as_millis() as u64
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            time_budget_ms: default_time_budget_ms(),
            default_language: LanguageId::PlainText,
        }
    }
}

impl HighlightConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from a specific file, or return defaults on any failure
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to a specific file
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Scheduler tunables, clamped to their minimums
    pub fn settings(&self) -> SchedulerSettings {
        SchedulerSettings::new(self.batch_size, Duration::from_millis(self.time_budget_ms))
    }
}
