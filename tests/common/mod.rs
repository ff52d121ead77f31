//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::sync::Arc;
use std::time::Duration;

use rebel_highlight::model::Document;
use rebel_highlight::scheduler::{ManualClock, SchedulerSettings};
use rebel_highlight::syntax::{HighlightError, LanguageId, LexicalEngine, RuleSet, Span};
use rebel_highlight::HighlightedBuffer;

/// A budget no test clock ever reaches
pub const NO_BUDGET: Duration = Duration::from_secs(3600);

/// Document with `lines` Python lines: `value_<i> = <i>`
pub fn numbered_document(lines: usize) -> Document {
    let text = (0..lines)
        .map(|i| format!("value_{i} = {i}"))
        .collect::<Vec<_>>()
        .join("\n");
    let mut doc = Document::with_text(&text);
    doc.language = LanguageId::Python;
    doc
}

pub fn python_rules() -> Arc<RuleSet> {
    Arc::new(RuleSet::builtin(LanguageId::Python).unwrap())
}

/// Buffer over `doc` with the built-in Python rules and a clock that never moves
pub fn python_buffer(doc: Document, batch_size: usize) -> HighlightedBuffer<RuleSet, ManualClock> {
    HighlightedBuffer::with_engine(
        doc,
        python_rules(),
        SchedulerSettings::new(batch_size, NO_BUDGET),
        ManualClock::new(),
    )
}

/// Same as `python_buffer` but with every block already highlighted
pub fn clean_python_buffer(lines: usize, batch_size: usize) -> HighlightedBuffer<RuleSet, ManualClock> {
    let mut buffer = python_buffer(numbered_document(lines), batch_size);
    buffer.run_until_idle();
    assert_eq!(buffer.pending_count(), 0);
    buffer
}

/// Engine that tags the whole line with style 0 and records what it saw
#[derive(Default)]
pub struct RecordingEngine {
    pub seen: RefCell<Vec<String>>,
}

impl LexicalEngine for RecordingEngine {
    fn highlight(&self, _: LanguageId, text: &str) -> Result<Vec<Span>, HighlightError> {
        self.seen.borrow_mut().push(text.to_string());
        Ok(vec![Span::new(0, text.len(), 0)])
    }
}

/// Engine that takes `per_call` of (manual) time for every block
pub struct SlowEngine {
    pub clock: ManualClock,
    pub per_call: Duration,
}

impl LexicalEngine for SlowEngine {
    fn highlight(&self, _: LanguageId, text: &str) -> Result<Vec<Span>, HighlightError> {
        self.clock.advance(self.per_call);
        Ok(vec![Span::new(0, text.len(), 0)])
    }
}

/// Engine that fails on lines containing `needle`
pub struct FailingEngine {
    pub needle: &'static str,
}

impl LexicalEngine for FailingEngine {
    fn highlight(&self, _: LanguageId, text: &str) -> Result<Vec<Span>, HighlightError> {
        if text.contains(self.needle) {
            Err(HighlightError::Engine(format!("cannot handle {text:?}")))
        } else {
            Ok(vec![Span::new(0, text.len(), 0)])
        }
    }
}

/// Texts of all blocks, in order
pub fn lines(doc: &Document) -> Vec<String> {
    doc.blocks().map(|(_, b)| b.text().to_string()).collect()
}
