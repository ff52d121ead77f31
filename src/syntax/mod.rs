//! Syntax highlighting module
//!
//! Provides regex rule based lexical highlighting with:
//! - Language detection from file extensions
//! - Ordered pattern → style rules (first match wins per character)
//! - Built-in rule sets plus YAML rule files from the config directory
//!
//! The scheduler only talks to the `LexicalEngine` trait, so any engine
//! that maps a line of text to spans can stand in for `RuleSet`.

mod error;
mod highlights;
mod languages;
mod rules;

pub use error::HighlightError;
pub use highlights::{
    highlight_id_for_name, highlight_name, HighlightId, Span, HIGHLIGHT_NAMES,
};
pub use languages::LanguageId;
pub use rules::{HighlightRule, LexicalEngine, RuleSet};
