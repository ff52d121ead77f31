//! A document bundled with its rule set and highlight scheduler
//!
//! `HighlightedBuffer` is what an editor surface holds per open file. Edits
//! go through it so every change reaches the scheduler, and an idle or
//! timer callback calls `run_batch()` until it returns false.

use std::sync::Arc;
use std::time::Duration;

use crate::model::{Block, BlockId, BlockRange, Document};
use crate::scheduler::{
    BatchReport, Clock, HighlightScheduler, SchedulerSettings, SystemClock,
};
use crate::syntax::{HighlightError, LanguageId, LexicalEngine, RuleSet, Span};

pub struct HighlightedBuffer<E: LexicalEngine = RuleSet, C: Clock = SystemClock> {
    document: Document,
    engine: Arc<E>,
    scheduler: HighlightScheduler<C>,
}

impl HighlightedBuffer<RuleSet, SystemClock> {
    /// Wrap a document with the built-in rules for its language.
    ///
    /// Every block starts dirty.
    pub fn new(document: Document) -> Result<Self, HighlightError> {
        let rules = RuleSet::builtin(document.language)?;
        Ok(Self::with_engine(
            document,
            Arc::new(rules),
            SchedulerSettings::default(),
            SystemClock,
        ))
    }

    /// Switch to the built-in rules of another language and rehighlight everything
    pub fn set_language(&mut self, language: LanguageId) -> Result<(), HighlightError> {
        let rules = RuleSet::builtin(language)?;
        self.set_engine(language, Arc::new(rules));
        Ok(())
    }
}

impl<E: LexicalEngine, C: Clock> HighlightedBuffer<E, C> {
    /// Wrap a document with an explicit engine, settings and clock.
    ///
    /// Every block starts dirty.
    pub fn with_engine(
        document: Document,
        engine: Arc<E>,
        settings: SchedulerSettings,
        clock: C,
    ) -> Self {
        let mut document = document;
        // Construction is not an edit
        document.take_edits();

        let mut scheduler = HighlightScheduler::with_clock(document.language, settings, clock);
        scheduler.force_full_rehighlight(&document);

        Self {
            document,
            engine,
            scheduler,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn scheduler(&self) -> &HighlightScheduler<C> {
        &self.scheduler
    }

    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    pub fn language(&self) -> LanguageId {
        self.document.language
    }

    /// Swap the engine and rehighlight every block.
    ///
    /// Batches run under `&mut self`, so no batch is in flight during the
    /// swap: blocks done before it were styled by the old engine and are
    /// dirtied again here.
    pub fn set_engine(&mut self, language: LanguageId, engine: Arc<E>) {
        tracing::info!(
            "Switching highlighting from {} to {}",
            self.document.language,
            language
        );
        self.document.language = language;
        self.engine = engine;
        self.scheduler.set_language(language);
        self.scheduler.force_full_rehighlight(&self.document);
    }

    // === Configuration ===

    pub fn settings(&self) -> SchedulerSettings {
        self.scheduler.settings()
    }

    pub fn set_batch_size(&mut self, batch_size: usize) {
        self.scheduler.set_batch_size(batch_size);
    }

    pub fn set_time_budget(&mut self, budget: Duration) {
        self.scheduler.set_time_budget(budget);
    }

    // === Edits ===

    /// Run an arbitrary document mutation and forward its edit notices
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut Document) -> R) -> R {
        let result = f(&mut self.document);
        self.sync_edits();
        result
    }

    pub fn set_block_text(&mut self, id: BlockId, text: impl Into<String>) -> bool {
        self.edit(|doc| doc.set_block_text(id, text))
    }

    pub fn insert_block(&mut self, position: usize, text: impl Into<String>) -> BlockId {
        self.edit(|doc| doc.insert_block(position, text))
    }

    pub fn remove_block(&mut self, id: BlockId) -> bool {
        self.edit(|doc| doc.remove_block(id))
    }

    pub fn insert_text(&mut self, id: BlockId, col: usize, text: &str) -> Option<BlockRange> {
        self.edit(|doc| doc.insert_text(id, col, text))
    }

    pub fn split_block(&mut self, id: BlockId, col: usize) -> Option<BlockId> {
        self.edit(|doc| doc.split_block(id, col))
    }

    pub fn join_with_next(&mut self, id: BlockId) -> bool {
        self.edit(|doc| doc.join_with_next(id))
    }

    fn sync_edits(&mut self) {
        let edits = self.document.take_edits();
        if !edits.is_empty() {
            self.scheduler.apply_edits(&self.document, edits);
        }
    }

    // === Scheduling ===

    /// Mark a range dirty without changing any text
    pub fn notify_edit(&mut self, range: BlockRange) {
        self.scheduler.notify_edit(&self.document, range);
    }

    pub fn rehighlight_block(&mut self, id: BlockId) {
        self.scheduler.rehighlight_block(&self.document, id);
    }

    pub fn force_full_rehighlight(&mut self) {
        self.scheduler.force_full_rehighlight(&self.document);
    }

    /// Process one batch. Returns true if work remains.
    pub fn run_batch(&mut self) -> bool {
        self.run_batch_report().has_pending()
    }

    pub fn run_batch_report(&mut self) -> BatchReport {
        self.scheduler
            .run_batch_report(&mut self.document, self.engine.as_ref())
    }

    /// Drive batches until nothing is dirty. Returns the number of batches run.
    pub fn run_until_idle(&mut self) -> usize {
        let mut batches = 0;
        while self.scheduler.pending_count() > 0 {
            batches += 1;
            if !self.run_batch() {
                break;
            }
        }
        batches
    }

    pub fn pending_count(&self) -> usize {
        self.scheduler.pending_count()
    }

    pub fn is_dirty(&self, id: BlockId) -> bool {
        self.scheduler.is_dirty(id)
    }

    // === Display ===

    /// Spans safe to paint: `None` while the block is dirty or gone
    pub fn display_spans(&self, id: BlockId) -> Option<&[Span]> {
        if self.scheduler.is_dirty(id) {
            return None;
        }
        self.document.block(id).map(Block::spans)
    }
}
