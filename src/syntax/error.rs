//! Errors raised while loading or applying highlighting rules

use std::path::PathBuf;

use thiserror::Error;

use super::languages::LanguageId;

#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unknown highlight style `{0}`")]
    UnknownStyle(String),

    #[error("unknown language `{0}`")]
    UnknownLanguage(String),

    #[error("{expected} rules cannot highlight {found} text")]
    LanguageMismatch {
        expected: LanguageId,
        found: LanguageId,
    },

    #[error("failed to parse rule file: {0}")]
    RuleFile(#[from] serde_yaml::Error),

    #[error("failed to read rule file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failure reported by an engine other than the built-in rule sets
    #[error("highlighting engine failed: {0}")]
    Engine(String),
}
