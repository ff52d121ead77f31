//! Language identification and detection
//!
//! Maps file extensions to language IDs and provides language metadata.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Supported language identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageId {
    #[default]
    PlainText,
    Python,
    Rust,
    JavaScript,
    Yaml,
}

impl LanguageId {
    /// All languages, in declaration order
    pub const ALL: &'static [LanguageId] = &[
        LanguageId::PlainText,
        LanguageId::Python,
        LanguageId::Rust,
        LanguageId::JavaScript,
        LanguageId::Yaml,
    ];

    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "py" | "pyw" | "pyi" => LanguageId::Python,
            "rs" => LanguageId::Rust,
            "js" | "mjs" | "cjs" => LanguageId::JavaScript,
            "yaml" | "yml" => LanguageId::Yaml,
            _ => LanguageId::PlainText,
        }
    }

    /// Detect language from file path
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(LanguageId::PlainText)
    }

    /// Parse a language name as used in rule files and on the command line
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "plaintext" | "plain" | "text" | "txt" => Some(LanguageId::PlainText),
            "python" | "py" => Some(LanguageId::Python),
            "rust" | "rs" => Some(LanguageId::Rust),
            "javascript" | "js" => Some(LanguageId::JavaScript),
            "yaml" | "yml" => Some(LanguageId::Yaml),
            _ => None,
        }
    }

    /// Canonical lowercase name (rule file stem)
    pub fn name(&self) -> &'static str {
        match self {
            LanguageId::PlainText => "plaintext",
            LanguageId::Python => "python",
            LanguageId::Rust => "rust",
            LanguageId::JavaScript => "javascript",
            LanguageId::Yaml => "yaml",
        }
    }

    /// Get display name for the language
    pub fn display_name(&self) -> &'static str {
        match self {
            LanguageId::PlainText => "Plain Text",
            LanguageId::Python => "Python",
            LanguageId::Rust => "Rust",
            LanguageId::JavaScript => "JavaScript",
            LanguageId::Yaml => "YAML",
        }
    }

    /// Check if this language has syntax highlighting support
    pub fn has_highlighting(&self) -> bool {
        !matches!(self, LanguageId::PlainText)
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
