//! Syntax highlighting data structures
//!
//! Defines style tags and the spans a rule pass produces for one block.

use serde::Serialize;

/// Style names a rule can tag a span with.
/// Index into this array is the HighlightId.
pub const HIGHLIGHT_NAMES: &[&str] = &[
    "attribute",        // #[derive], @decorator
    "boolean",          // true, false
    "comment",          // # ..., // ...
    "constant",         // SCREAMING_CASE
    "constant.builtin", // None, null
    "escape",           // string escapes
    "function",         // def name, fn name
    "function.builtin", // print, println!
    "keyword",          // if, class, fn
    "keyword.operator", // and, or, not
    "label",            // YAML anchors and aliases
    "number",           // 42, 0xff
    "operator",         // + - * /
    "property",         // YAML keys
    "punctuation",      // ( ) [ ] ,
    "string",           // "..." '...'
    "type",             // class names, struct names
    "type.builtin",     // int, str, u32
    "variable",         // identifiers
    "variable.builtin", // self, this
];

/// Index into HIGHLIGHT_NAMES
pub type HighlightId = u16;

/// A single styled run within a block's text.
///
/// Offsets are in bytes and always fall on char boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    /// Start offset (inclusive)
    pub start: usize,
    /// Length of the run
    pub len: usize,
    /// Index into HIGHLIGHT_NAMES
    pub style: HighlightId,
}

impl Span {
    pub fn new(start: usize, len: usize, style: HighlightId) -> Self {
        Self { start, len, style }
    }

    /// End offset (exclusive)
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// The style name this span is tagged with
    pub fn style_name(&self) -> &'static str {
        highlight_name(self.style).unwrap_or("unknown")
    }
}

/// Look up highlight ID by style name
pub fn highlight_id_for_name(name: &str) -> Option<HighlightId> {
    // Handle hierarchical names: try exact match first, then progressively shorter
    // parents (e.g. "keyword.control.import" -> "keyword.control" -> "keyword").
    let mut current = name;
    loop {
        if let Some(pos) = HIGHLIGHT_NAMES.iter().position(|&n| n == current) {
            return Some(pos as HighlightId);
        }

        let Some(dot_pos) = current.rfind('.') else {
            break;
        };
        current = &current[..dot_pos];
    }

    None
}

/// Look up the style name for a highlight ID
pub fn highlight_name(id: HighlightId) -> Option<&'static str> {
    HIGHLIGHT_NAMES.get(id as usize).copied()
}
