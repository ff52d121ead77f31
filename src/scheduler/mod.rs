//! Incremental highlight scheduler
//!
//! Tracks which blocks changed since the last highlight pass and
//! rehighlights only those, a bounded batch at a time, so an idle-time or
//! timer driven caller can keep styling current without stalling edits.
//!
//! ## Batch policy
//!
//! ```text
//! notify_edit ──► DirtySet ──► run_batch ──► engine(text at processing time)
//!                    ▲              │
//!                    └── remains ◄──┘ stop on: batch_size | time budget | drained
//! ```
//!
//! - Dirty blocks are visited in document order, resuming just after the
//!   last block the previous batch processed and wrapping to the top. Only
//!   dirty blocks are looked at, so a batch costs the same in a ten-line
//!   file and a two-million-line one.
//! - The time budget is checked after each block, never mid-block. One very
//!   long line can overrun the budget once.
//! - An engine error leaves the block unstyled and clean. It is never
//!   retried, so the dirty set always drains.
//!
//! The scheduler owns none of its collaborators: the document and the
//! engine are passed into each call. `&mut self` on every mutating call
//! serializes batches against edit notices.

mod clock;
mod dirty;

use std::collections::HashSet;
use std::time::Duration;

pub use clock::{Clock, ManualClock, SystemClock};
pub use dirty::DirtySet;

use crate::model::{BlockId, BlockRange, BlockSource, BlockStore, DocumentEdit};
use crate::syntax::{LanguageId, LexicalEngine};

/// Blocks processed per batch unless configured otherwise
pub const DEFAULT_BATCH_SIZE: usize = 50;
/// Wall-clock budget per batch unless configured otherwise
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_millis(20);
/// Smallest accepted time budget
pub const MIN_TIME_BUDGET: Duration = Duration::from_millis(1);

/// The two scheduling tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerSettings {
    /// Max blocks processed per batch (at least 1)
    pub batch_size: usize,
    /// Max wall-clock time per batch (at least 1ms)
    pub time_budget: Duration,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            time_budget: DEFAULT_TIME_BUDGET,
        }
    }
}

impl SchedulerSettings {
    /// Build settings, clamping both values to their minimums
    pub fn new(batch_size: usize, time_budget: Duration) -> Self {
        Self {
            batch_size: batch_size.max(1),
            time_budget: time_budget.max(MIN_TIME_BUDGET),
        }
    }
}

/// Why a batch stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStop {
    /// No dirty blocks left
    Drained,
    /// `batch_size` blocks were processed
    BatchSize,
    /// The time budget ran out
    TimeBudget,
}

/// Outcome of one `run_batch` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    /// Blocks taken off the dirty set (including failures)
    pub processed: usize,
    /// Blocks the engine failed on, left unstyled
    pub failed: usize,
    /// Time spent in the batch
    pub elapsed: Duration,
    /// Dirty blocks left afterwards
    pub remaining: usize,
    pub stop: BatchStop,
}

impl BatchReport {
    pub fn has_pending(&self) -> bool {
        self.remaining > 0
    }
}

/// Incremental, time-boxed rehighlighting of dirty blocks
#[derive(Debug)]
pub struct HighlightScheduler<C: Clock = SystemClock> {
    settings: SchedulerSettings,
    language: LanguageId,
    dirty: DirtySet,
    /// Blocks dirtied since the last `clear_modified` (diagnostics only)
    modified: HashSet<BlockId>,
    /// Last block processed; the next batch resumes after it
    cursor: Option<BlockId>,
    /// Armed when the dirty set goes from empty to non-empty
    pending_work: bool,
    last_report: Option<BatchReport>,
    clock: C,
}

impl HighlightScheduler<SystemClock> {
    pub fn new(language: LanguageId) -> Self {
        Self::with_clock(language, SchedulerSettings::default(), SystemClock)
    }

    pub fn with_settings(language: LanguageId, settings: SchedulerSettings) -> Self {
        Self::with_clock(language, settings, SystemClock)
    }
}

impl<C: Clock> HighlightScheduler<C> {
    pub fn with_clock(language: LanguageId, settings: SchedulerSettings, clock: C) -> Self {
        Self {
            settings: SchedulerSettings::new(settings.batch_size, settings.time_budget),
            language,
            dirty: DirtySet::new(),
            modified: HashSet::new(),
            cursor: None,
            pending_work: false,
            last_report: None,
            clock,
        }
    }

    // === Configuration ===

    pub fn settings(&self) -> SchedulerSettings {
        self.settings
    }

    /// Set the max blocks per batch (clamped to at least 1)
    pub fn set_batch_size(&mut self, batch_size: usize) {
        self.settings.batch_size = batch_size.max(1);
    }

    /// Set the time budget per batch (clamped to at least 1ms)
    pub fn set_time_budget(&mut self, budget: Duration) {
        self.settings.time_budget = budget.max(MIN_TIME_BUDGET);
    }

    pub fn language(&self) -> LanguageId {
        self.language
    }

    /// Switch the language passed to the engine.
    ///
    /// Does not dirty anything; callers switching rule sets follow up with
    /// `force_full_rehighlight`.
    pub fn set_language(&mut self, language: LanguageId) {
        self.language = language;
    }

    // === Edit notices ===

    /// Mark every live block in `range` dirty.
    ///
    /// Stale endpoints are dropped: with one live endpoint only that block
    /// is marked, with none the call does nothing.
    pub fn notify_edit<S>(&mut self, source: &S, range: BlockRange)
    where
        S: BlockSource + ?Sized,
    {
        let (start, end) = match (source.position(range.first), source.position(range.last)) {
            (Some(a), Some(b)) => (a.min(b), a.max(b)),
            (Some(p), None) | (None, Some(p)) => (p, p),
            (None, None) => {
                tracing::trace!(
                    "notify_edit: dropping stale range {}..{}",
                    range.first,
                    range.last
                );
                return;
            }
        };

        for position in start..=end {
            if let Some(id) = source.id_at(position) {
                self.mark(id);
            }
        }
    }

    /// Mark a single block dirty
    pub fn rehighlight_block<S>(&mut self, source: &S, id: BlockId)
    where
        S: BlockSource + ?Sized,
    {
        if source.contains(id) {
            self.mark(id);
        }
    }

    /// Mark every block dirty and restart traversal from the top
    pub fn force_full_rehighlight<S>(&mut self, source: &S)
    where
        S: BlockSource + ?Sized,
    {
        for position in 0..source.block_count() {
            if let Some(id) = source.id_at(position) {
                self.mark(id);
            }
        }
        self.cursor = None;
        tracing::debug!(
            "force_full_rehighlight: {} blocks pending",
            self.dirty.len()
        );
    }

    /// Consume notices drained from a document
    pub fn apply_edits<S, I>(&mut self, source: &S, edits: I)
    where
        S: BlockSource + ?Sized,
        I: IntoIterator<Item = DocumentEdit>,
    {
        for edit in edits {
            match edit {
                DocumentEdit::Changed(range) => self.notify_edit(source, range),
                DocumentEdit::Removed(id) => self.forget(id),
            }
        }
    }

    /// Drop a deleted block from all tracking
    pub fn forget(&mut self, id: BlockId) {
        self.dirty.remove(id);
        self.modified.remove(&id);
        if self.cursor == Some(id) {
            self.cursor = None;
        }
        self.pending_work = !self.dirty.is_empty();
    }

    fn mark(&mut self, id: BlockId) {
        let was_empty = self.dirty.is_empty();
        self.dirty.insert(id);
        self.modified.insert(id);
        if was_empty {
            self.pending_work = true;
            tracing::trace!("highlight work armed by {}", id);
        }
    }

    // === Batches ===

    /// Process one batch. Returns true if dirty blocks remain.
    pub fn run_batch<S, E>(&mut self, store: &mut S, engine: &E) -> bool
    where
        S: BlockStore + ?Sized,
        E: LexicalEngine + ?Sized,
    {
        self.run_batch_report(store, engine).has_pending()
    }

    /// Process one batch and describe what happened
    pub fn run_batch_report<S, E>(&mut self, store: &mut S, engine: &E) -> BatchReport
    where
        S: BlockStore + ?Sized,
        E: LexicalEngine + ?Sized,
    {
        let started = self.clock.now();

        // A deleted block can't be dirty
        self.dirty.retain(|id| store.contains(id));
        self.modified.retain(|&id| store.contains(id));

        let resume = self
            .cursor
            .and_then(|id| store.position(id))
            .map_or(0, |position| position + 1);
        let queue = self.batch_queue(&*store, resume);

        let mut processed = 0;
        let mut failed = 0;
        let mut stop = BatchStop::Drained;

        for id in queue {
            // Text is read now, not when the block was dirtied
            let result = match store.text(id) {
                Some(text) => engine.highlight(self.language, text),
                None => continue,
            };
            let spans = result.unwrap_or_else(|e| {
                failed += 1;
                tracing::warn!("Highlighting {} failed, leaving it unstyled: {}", id, e);
                Vec::new()
            });

            store.store_spans(id, spans);
            self.dirty.remove(id);
            self.cursor = Some(id);
            processed += 1;

            if self.dirty.is_empty() {
                break;
            }
            if processed >= self.settings.batch_size {
                stop = BatchStop::BatchSize;
                break;
            }
            if self.clock.now().saturating_duration_since(started) > self.settings.time_budget {
                stop = BatchStop::TimeBudget;
                break;
            }
        }

        let remaining = self.dirty.len();
        if remaining == 0 {
            stop = BatchStop::Drained;
        }
        self.pending_work = remaining > 0;

        let report = BatchReport {
            processed,
            failed,
            elapsed: self.clock.now().saturating_duration_since(started),
            remaining,
            stop,
        };

        if processed > 0 {
            tracing::debug!(
                "run_batch: processed={} failed={} remaining={} stop={:?} elapsed={:?}",
                report.processed,
                report.failed,
                report.remaining,
                report.stop,
                report.elapsed
            );
        }

        self.last_report = Some(report);
        report
    }

    /// The next `batch_size` dirty blocks in document order, starting at
    /// `resume` and wrapping to the top.
    ///
    /// Cost follows the number of dirty blocks, never the number of clean
    /// ones: clean blocks between two dirty ones are not visited.
    fn batch_queue<S>(&self, source: &S, resume: usize) -> Vec<BlockId>
    where
        S: BlockSource + ?Sized,
    {
        let count = source.block_count().max(1);
        let resume = resume % count;
        let mut keyed: Vec<(usize, BlockId)> = self
            .dirty
            .iter()
            .filter_map(|id| {
                let position = source.position(id)?;
                Some(((position + count - resume) % count, id))
            })
            .collect();

        let take = self.settings.batch_size.min(keyed.len());
        if take < keyed.len() {
            keyed.select_nth_unstable_by_key(take, |&(key, _)| key);
            keyed.truncate(take);
        }
        keyed.sort_unstable_by_key(|&(key, _)| key);
        keyed.into_iter().map(|(_, id)| id).collect()
    }

    // === Diagnostics ===

    /// Number of dirty blocks
    pub fn pending_count(&self) -> usize {
        self.dirty.len()
    }

    /// Whether work was armed and not yet drained
    pub fn has_pending_work(&self) -> bool {
        self.pending_work
    }

    /// Whether a block's cached spans are stale
    pub fn is_dirty(&self, id: BlockId) -> bool {
        self.dirty.contains(id)
    }

    /// Number of blocks dirtied since the last `clear_modified`
    pub fn modified_count(&self) -> usize {
        self.modified.len()
    }

    pub fn clear_modified(&mut self) {
        self.modified.clear();
    }

    pub fn last_report(&self) -> Option<BatchReport> {
        self.last_report
    }
}
