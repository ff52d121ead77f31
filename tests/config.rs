//! Configuration system tests
//!
//! Tests for config paths, highlighter config and user rule files.

use std::time::Duration;

use rebel_highlight::config::HighlightConfig;
use rebel_highlight::config_paths;
use rebel_highlight::scheduler::SchedulerSettings;
use rebel_highlight::syntax::{LanguageId, RuleSet};

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_contains_app_name() {
    if let Some(dir) = config_paths::config_dir() {
        assert!(dir.to_string_lossy().contains("rebel-highlight"));
    }
}

#[test]
fn test_config_file_ends_with_yaml() {
    if let Some(path) = config_paths::config_file() {
        assert!(path.to_string_lossy().ends_with("config.yaml"));
    }
}

#[test]
fn test_language_file_is_under_languages_dir() {
    let (Some(dir), Some(file)) = (
        config_paths::languages_dir(),
        config_paths::language_file(LanguageId::Python),
    ) else {
        return;
    };
    assert!(file.starts_with(&dir));
    assert_eq!(file.file_name().unwrap(), "python.yaml");
}

#[cfg(not(target_os = "windows"))]
#[test]
fn test_xdg_config_home_drives_rules_logs_and_config() {
    let home = tempfile::tempdir().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", home.path());

    let languages = home.path().join("rebel-highlight").join("languages");
    assert_eq!(config_paths::languages_dir(), Some(languages.clone()));

    // No file yet: built-in rules
    let builtin = RuleSet::load_for(LanguageId::Python).unwrap();
    assert_eq!(builtin.len(), RuleSet::builtin(LanguageId::Python).unwrap().len());

    std::fs::create_dir_all(&languages).unwrap();
    std::fs::write(
        languages.join("python.yaml"),
        "language: python\nrules:\n  - pattern: '\\bTODO\\b'\n    style: keyword\n",
    )
    .unwrap();
    let user = RuleSet::load_for(LanguageId::Python).unwrap();
    assert_eq!(user.len(), 1);

    // A rule file for the wrong language is rejected
    std::fs::write(languages.join("yaml.yaml"), "language: rust\n").unwrap();
    assert!(RuleSet::load_for(LanguageId::Yaml).is_err());

    let logs = config_paths::ensure_logs_dir().unwrap();
    assert!(logs.is_dir());
    assert_eq!(config_paths::logs_dir(), Some(logs));

    // save/load go through the same directory
    let config = HighlightConfig {
        batch_size: 12,
        time_budget_ms: 4,
        default_language: LanguageId::Yaml,
    };
    config.save().unwrap();
    assert!(config_paths::config_file().unwrap().starts_with(home.path()));
    assert_eq!(HighlightConfig::load(), config);

    std::env::remove_var("XDG_CONFIG_HOME");
}

// ========================================================================
// Highlight Config Tests
// ========================================================================

#[test]
fn test_default_config() {
    let config = HighlightConfig::default();
    assert_eq!(config.batch_size, 50);
    assert_eq!(config.time_budget_ms, 20);
    assert_eq!(config.default_language, LanguageId::PlainText);
    assert_eq!(config.settings(), SchedulerSettings::default());
}

#[test]
fn test_missing_file_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = HighlightConfig::load_from(&dir.path().join("config.yaml"));
    assert_eq!(config, HighlightConfig::default());
}

#[test]
fn test_invalid_file_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "batch_size: [not a number").unwrap();

    assert_eq!(HighlightConfig::load_from(&path), HighlightConfig::default());
}

#[test]
fn test_partial_file_fills_in_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "time_budget_ms: 8\n").unwrap();

    let config = HighlightConfig::load_from(&path);
    assert_eq!(config.batch_size, 50);
    assert_eq!(config.time_budget_ms, 8);
    assert_eq!(config.default_language, LanguageId::PlainText);
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.yaml");
    let config = HighlightConfig {
        batch_size: 10,
        time_budget_ms: 5,
        default_language: LanguageId::Python,
    };

    config.save_to(&path).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("default_language: python"));

    assert_eq!(HighlightConfig::load_from(&path), config);
}

#[test]
fn test_settings_are_clamped() {
    let config = HighlightConfig {
        batch_size: 0,
        time_budget_ms: 0,
        default_language: LanguageId::PlainText,
    };
    let settings = config.settings();
    assert_eq!(settings.batch_size, 1);
    assert_eq!(settings.time_budget, Duration::from_millis(1));
}
