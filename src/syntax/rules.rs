//! Pattern → style rule sets and the lexical engine seam
//!
//! A `RuleSet` is an ordered list of `HighlightRule`s for one language.
//! Rules are tried in order and the first rule to match a character owns
//! it: later matches only style the characters nobody claimed yet. When a
//! pattern has a first capture group that took part in the match, only the
//! group is styled (`\bdef\s+(\w+)` styles the name, not `def`).
//!
//! Rule sets are immutable once built. Share one between documents with
//! an `Arc` rather than mutating it in place.

use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use super::error::HighlightError;
use super::highlights::{highlight_id_for_name, HighlightId, Span};
use super::languages::LanguageId;

/// Turns one block of text into styled spans.
///
/// Implementations must be pure from the caller's point of view: the same
/// language and text always produce the same spans.
pub trait LexicalEngine {
    fn highlight(&self, language: LanguageId, text: &str) -> Result<Vec<Span>, HighlightError>;
}

/// A single (pattern, style) pair
#[derive(Debug, Clone)]
pub struct HighlightRule {
    pattern: Regex,
    style: HighlightId,
}

impl HighlightRule {
    pub fn new(pattern: &str, style: HighlightId) -> Result<Self, HighlightError> {
        let regex = Regex::new(pattern).map_err(|source| HighlightError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            pattern: regex,
            style,
        })
    }

    /// Build a rule from a style name such as `"keyword"` or `"string.special"`
    pub fn named(pattern: &str, style: &str) -> Result<Self, HighlightError> {
        let id = highlight_id_for_name(style)
            .ok_or_else(|| HighlightError::UnknownStyle(style.to_string()))?;
        Self::new(pattern, id)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn style(&self) -> HighlightId {
        self.style
    }
}

/// Ordered rules for one language
#[derive(Debug, Clone)]
pub struct RuleSet {
    language: LanguageId,
    rules: Vec<HighlightRule>,
}

#[derive(Debug, Deserialize)]
struct RuleFile {
    language: String,
    #[serde(default)]
    rules: Vec<RuleEntry>,
}

#[derive(Debug, Deserialize)]
struct RuleEntry {
    pattern: String,
    style: String,
}

impl RuleSet {
    pub fn new(language: LanguageId, rules: Vec<HighlightRule>) -> Self {
        Self { language, rules }
    }

    /// A rule set that styles nothing
    pub fn empty(language: LanguageId) -> Self {
        Self::new(language, Vec::new())
    }

    /// The rules that ship with the crate for `language`
    pub fn builtin(language: LanguageId) -> Result<Self, HighlightError> {
        let rules = builtin_rules(language)
            .iter()
            .map(|(pattern, style)| HighlightRule::named(pattern, style))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(language, rules))
    }

    /// Parse a YAML rule file:
    ///
    /// ```yaml
    /// language: python
    /// rules:
    ///   - pattern: '#.*'
    ///     style: comment
    /// ```
    pub fn from_yaml(source: &str) -> Result<Self, HighlightError> {
        let file: RuleFile = serde_yaml::from_str(source)?;
        let language = LanguageId::from_name(&file.language)
            .ok_or_else(|| HighlightError::UnknownLanguage(file.language.clone()))?;
        let rules = file
            .rules
            .iter()
            .map(|entry| HighlightRule::named(&entry.pattern, &entry.style))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(language, rules))
    }

    /// Load a YAML rule file from disk
    pub fn from_file(path: &Path) -> Result<Self, HighlightError> {
        let source = std::fs::read_to_string(path).map_err(|source| HighlightError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let rules = Self::from_yaml(&source)?;
        tracing::info!(
            "Loaded {} {} rules from {}",
            rules.len(),
            rules.language.name(),
            path.display()
        );
        Ok(rules)
    }

    /// User rule file from the config directory if one exists, else the built-in set
    pub fn load_for(language: LanguageId) -> Result<Self, HighlightError> {
        let Some(path) = crate::config_paths::language_file(language) else {
            return Self::builtin(language);
        };

        if !path.exists() {
            tracing::debug!(
                "No rule file at {}, using built-in {} rules",
                path.display(),
                language.name()
            );
            return Self::builtin(language);
        }

        let rules = Self::from_file(&path)?;
        if rules.language != language {
            return Err(HighlightError::LanguageMismatch {
                expected: language,
                found: rules.language,
            });
        }
        Ok(rules)
    }

    pub fn language(&self) -> LanguageId {
        self.language
    }

    pub fn rules(&self) -> &[HighlightRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule to `text`, returning spans sorted by start
    pub fn spans(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        if self.rules.is_empty() || text.is_empty() {
            return spans;
        }

        let mut claimed = vec![false; text.len()];
        for rule in &self.rules {
            if rule.pattern.captures_len() > 1 {
                for caps in rule.pattern.captures_iter(text) {
                    if let Some(m) = caps.get(1).or_else(|| caps.get(0)) {
                        claim(&mut claimed, &mut spans, m.start(), m.end(), rule.style);
                    }
                }
            } else {
                for m in rule.pattern.find_iter(text) {
                    claim(&mut claimed, &mut spans, m.start(), m.end(), rule.style);
                }
            }
        }

        spans.sort_by_key(|span| span.start);
        spans
    }
}

impl LexicalEngine for RuleSet {
    fn highlight(&self, language: LanguageId, text: &str) -> Result<Vec<Span>, HighlightError> {
        if language != self.language {
            return Err(HighlightError::LanguageMismatch {
                expected: self.language,
                found: language,
            });
        }
        Ok(self.spans(text))
    }
}

/// Emit the unclaimed runs of `start..end` as spans and claim them.
fn claim(
    claimed: &mut [bool],
    spans: &mut Vec<Span>,
    start: usize,
    end: usize,
    style: HighlightId,
) {
    let mut run_start: Option<usize> = None;
    for pos in start..end {
        if claimed[pos] {
            if let Some(s) = run_start.take() {
                spans.push(Span::new(s, pos - s, style));
            }
        } else {
            claimed[pos] = true;
            run_start.get_or_insert(pos);
        }
    }
    if let Some(s) = run_start {
        spans.push(Span::new(s, end - s, style));
    }
}

// Comment patterns walk the code before the comment start, skipping over
// string literals, so quotes inside a trailing comment stay comment text
// and a comment marker inside a string is not a comment. Only group 1 is styled.
const PYTHON_COMMENT: &str = r##"^(?:[^'"#]|"[^"]*"|'[^']*')*(#.*)"##;

const RUST_COMMENT: &str = r#"^(?:[^"'/]|'(?:[^'\\]|\\.)'|'|/[^/"]|"(?:[^"\\]|\\.)*")*(//.*)"#;

const JS_COMMENT: &str =
    r#"^(?:[^"'`/]|/[^/"'`]|"(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'|`[^`]*`)*(//.*)"#;

const PYTHON_KEYWORDS: &str = r"\b(?:and|as|assert|break|class|continue|def|del|elif|else|except|False|finally|for|from|global|if|import|in|is|lambda|None|nonlocal|not|or|pass|raise|return|True|try|while|with|yield)\b";

const RUST_KEYWORDS: &str = r"\b(?:as|async|await|break|const|continue|crate|dyn|else|enum|extern|fn|for|if|impl|in|let|loop|match|mod|move|mut|pub|ref|return|static|struct|trait|type|unsafe|use|where|while)\b";

const JS_KEYWORDS: &str = r"\b(?:async|await|break|case|catch|class|const|continue|default|delete|do|else|export|extends|finally|for|from|function|if|import|in|instanceof|let|new|of|return|static|switch|throw|try|typeof|var|void|while|yield)\b";

/// (pattern, style) pairs, in precedence order
fn builtin_rules(language: LanguageId) -> &'static [(&'static str, &'static str)] {
    match language {
        LanguageId::PlainText => &[],
        LanguageId::Python => &[
            (PYTHON_COMMENT, "comment"),
            (r#""[^"]*""#, "string"),
            (r"'[^']*'", "string"),
            (PYTHON_KEYWORDS, "keyword"),
            (r"\bclass\b\s*(\w+)", "type"),
            (r"\bdef\b\s*(\w+)", "function"),
            (r"\b[0-9]+\b", "number"),
        ],
        LanguageId::Rust => &[
            (RUST_COMMENT, "comment"),
            (r#""(?:[^"\\]|\\.)*""#, "string"),
            (r"#!?\[[^\]]*\]", "attribute"),
            (RUST_KEYWORDS, "keyword"),
            (r"\b(?:self|Self|super)\b", "variable.builtin"),
            (r"\b(?:true|false)\b", "boolean"),
            (
                r"\b(?:u8|u16|u32|u64|u128|usize|i8|i16|i32|i64|i128|isize|f32|f64|bool|char|str|String)\b",
                "type.builtin",
            ),
            (r"\bfn\s+(\w+)", "function"),
            (r"\b(?:struct|enum|trait|type)\s+(\w+)", "type"),
            (r"\b\w+!", "function.builtin"),
            (r"\b[0-9][0-9_]*(?:\.[0-9_]+)?\b", "number"),
        ],
        LanguageId::JavaScript => &[
            (JS_COMMENT, "comment"),
            (r#""(?:[^"\\]|\\.)*""#, "string"),
            (r"'(?:[^'\\]|\\.)*'", "string"),
            (r"`[^`]*`", "string"),
            (JS_KEYWORDS, "keyword"),
            (r"\b(?:true|false)\b", "boolean"),
            (r"\b(?:null|undefined)\b", "constant.builtin"),
            (r"\bthis\b", "variable.builtin"),
            (r"\bfunction\s+(\w+)", "function"),
            (r"\bclass\s+(\w+)", "type"),
            (r"\b[0-9]+(?:\.[0-9]+)?\b", "number"),
        ],
        LanguageId::Yaml => &[
            (r"^\s*(#.*)", "comment"),
            (r#""(?:[^"\\]|\\.)*""#, "string"),
            (r"'[^']*'", "string"),
            (r"\s(#.*)", "comment"),
            (r"^\s*(?:-\s+)?([\w.-]+)\s*:(?:\s|$)", "property"),
            (r"^\s*(-)\s", "punctuation"),
            (r"[&*][\w-]+", "label"),
            (r"\b(?:true|false|yes|no|on|off)\b", "boolean"),
            (r"\bnull\b|~", "constant.builtin"),
            (r"-?\b[0-9]+(?:\.[0-9]+)?\b", "number"),
        ],
    }
}
