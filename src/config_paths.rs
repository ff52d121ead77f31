//! Centralized configuration paths for rebel-highlight
//!
//! All config files live under:
//! - Unix/macOS: `~/.config/rebel-highlight/`
//! - Windows: `%APPDATA%\rebel-highlight\`
//!
//! This module is the single source of truth for config paths.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::syntax::LanguageId;

const APP_DIR: &str = "rebel-highlight";

/// Base config directory for rebel-highlight
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/rebel-highlight`
///   - Else: `~/.config/rebel-highlight`
///
/// Windows:
///   - `%APPDATA%\rebel-highlight`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/rebel-highlight/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `~/.config/rebel-highlight/languages/`
pub fn languages_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("languages"))
}

/// `~/.config/rebel-highlight/languages/<name>.yaml`
pub fn language_file(language: LanguageId) -> Option<PathBuf> {
    languages_dir().map(|dir| dir.join(format!("{}.yaml", language.name())))
}

/// `~/.config/rebel-highlight/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

fn ensure_dir(path: &Path) -> Result<(), String> {
    fs::create_dir_all(path)
        .map_err(|e| format!("Failed to create directory {}: {}", path.display(), e))
}

/// Ensure logs dir exists, returning it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let logs = logs_dir().ok_or_else(|| "No config directory available".to_string())?;
    ensure_dir(&logs)?;
    Ok(logs)
}
