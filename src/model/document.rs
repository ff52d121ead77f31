//! Document model - an ordered sequence of blocks with stable identities
//!
//! Every mutation queues `DocumentEdit` notices that a highlighter drains
//! with `take_edits()`. Nothing here knows about highlighting beyond the
//! cached spans each block carries.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use ropey::Rope;

use super::block::{Block, BlockArena, BlockId};
use crate::syntax::{LanguageId, Span};
use crate::util::{floor_char_boundary, split_lines, trim_line_ending};

/// A contiguous run of blocks, named by the ids at either end (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    pub first: BlockId,
    pub last: BlockId,
}

impl BlockRange {
    pub fn new(first: BlockId, last: BlockId) -> Self {
        Self { first, last }
    }

    pub fn single(id: BlockId) -> Self {
        Self::new(id, id)
    }
}

/// Notice emitted by every document mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentEdit {
    /// Text of these blocks changed, or they were just inserted
    Changed(BlockRange),
    /// This block no longer exists
    Removed(BlockId),
}

/// Read access a highlighter needs from a document
pub trait BlockSource {
    /// Number of blocks in the document
    fn block_count(&self) -> usize;

    /// Id of the block at `position` in document order
    fn id_at(&self, position: usize) -> Option<BlockId>;

    /// Current position of a live block. Batches call this once per dirty
    /// block, so it should not scan the document.
    fn position(&self, id: BlockId) -> Option<usize>;

    /// Current text of a live block
    fn text(&self, id: BlockId) -> Option<&str>;

    fn contains(&self, id: BlockId) -> bool {
        self.text(id).is_some()
    }
}

/// Write access for storing the result of a highlight pass
pub trait BlockStore: BlockSource {
    /// Replace a block's cached spans. Returns false if the block is gone.
    fn store_spans(&mut self, id: BlockId, spans: Vec<Span>) -> bool;
}

/// Document state - the blocks and associated file metadata
#[derive(Debug, Clone)]
pub struct Document {
    blocks: BlockArena,
    /// Block ids in document order
    order: Vec<BlockId>,
    /// Position of each live block, indexed by arena slot
    positions: Vec<usize>,
    /// Path to the file on disk (None for new buffers)
    pub file_path: Option<PathBuf>,
    /// Detected language for syntax highlighting
    pub language: LanguageId,
    /// Document revision counter (incremented on each edit)
    pub revision: u64,
    /// Queued edit notices, drained by `take_edits`
    edits: Vec<DocumentEdit>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a new document holding a single empty block
    pub fn new() -> Self {
        Self::with_text("")
    }

    /// Create a document with initial text, one block per line
    pub fn with_text(text: &str) -> Self {
        Self::from_rope(&Rope::from_str(text))
    }

    /// Load a document from a file path
    pub fn from_file(path: PathBuf) -> Result<Self, std::io::Error> {
        let rope = Rope::from_reader(BufReader::new(File::open(&path)?))?;
        let mut document = Self::from_rope(&rope);
        document.language = LanguageId::from_path(&path);
        document.file_path = Some(path);
        Ok(document)
    }

    fn from_rope(rope: &Rope) -> Self {
        let mut blocks = BlockArena::new();
        let mut order = Vec::with_capacity(rope.len_lines());
        for line in rope.lines() {
            let line = line.to_string();
            order.push(blocks.insert(Block::new(trim_line_ending(&line))));
        }

        let mut document = Self {
            blocks,
            order,
            positions: Vec::new(),
            file_path: None,
            language: LanguageId::PlainText,
            revision: 0,
            edits: Vec::new(),
        };
        document.reindex_from(0);
        document
    }

    /// Reassemble the full text, lines joined with `\n`
    pub fn to_rope(&self) -> Rope {
        Rope::from(self.to_string())
    }

    pub fn block_count(&self) -> usize {
        self.order.len()
    }

    /// Block ids in document order
    pub fn block_ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.order.iter().copied()
    }

    /// Blocks in document order
    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &Block)> + '_ {
        self.order
            .iter()
            .filter_map(|&id| self.blocks.get(id).map(|block| (id, block)))
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id)
    }

    pub fn id_at(&self, position: usize) -> Option<BlockId> {
        self.order.get(position).copied()
    }

    pub fn position(&self, id: BlockId) -> Option<usize> {
        if !self.blocks.contains(id) {
            return None;
        }
        self.positions.get(id.index() as usize).copied()
    }

    pub fn text(&self, id: BlockId) -> Option<&str> {
        self.blocks.get(id).map(Block::text)
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.blocks.contains(id)
    }

    /// Drain queued edit notices
    pub fn take_edits(&mut self) -> Vec<DocumentEdit> {
        std::mem::take(&mut self.edits)
    }

    pub fn has_pending_edits(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Refresh cached positions for every block at or after `start`
    fn reindex_from(&mut self, start: usize) {
        let Self {
            order, positions, ..
        } = self;
        for (position, id) in order.iter().enumerate().skip(start) {
            let slot = id.index() as usize;
            if slot >= positions.len() {
                positions.resize(slot + 1, 0);
            }
            positions[slot] = position;
        }
    }

    fn record(&mut self, edit: DocumentEdit) {
        self.revision += 1;
        self.edits.push(edit);
    }

    // === Edit operations ===

    /// Replace a block's text in place
    pub fn set_block_text(&mut self, id: BlockId, text: impl Into<String>) -> bool {
        let Some(block) = self.blocks.get_mut(id) else {
            return false;
        };
        block.set_text(text.into());
        self.record(DocumentEdit::Changed(BlockRange::single(id)));
        true
    }

    /// Insert a new block at `position` (clamped to the end)
    pub fn insert_block(&mut self, position: usize, text: impl Into<String>) -> BlockId {
        let position = position.min(self.order.len());
        let id = self.blocks.insert(Block::new(text));
        self.order.insert(position, id);
        self.reindex_from(position);
        self.record(DocumentEdit::Changed(BlockRange::single(id)));
        id
    }

    /// Append a new block at the end
    pub fn push_block(&mut self, text: impl Into<String>) -> BlockId {
        self.insert_block(self.order.len(), text)
    }

    /// Delete a block. The last remaining block is cleared instead.
    pub fn remove_block(&mut self, id: BlockId) -> bool {
        let Some(position) = self.position(id) else {
            return false;
        };

        if self.order.len() == 1 {
            return self.set_block_text(id, String::new());
        }

        self.order.remove(position);
        self.blocks.remove(id);
        self.reindex_from(position);
        self.record(DocumentEdit::Removed(id));
        true
    }

    /// Insert `text` at a byte column of a block.
    ///
    /// Line breaks in `text` split the block: the original id keeps the head,
    /// new blocks are created after it. Returns the range of blocks touched.
    pub fn insert_text(&mut self, id: BlockId, col: usize, text: &str) -> Option<BlockRange> {
        let position = self.position(id)?;
        let current = self.blocks.get(id)?.text();
        let col = floor_char_boundary(current, col);
        let head = &current[..col];
        let tail = current[col..].to_string();

        let mut pieces = split_lines(text);
        let last_piece = pieces.pop().unwrap_or_default();

        if pieces.is_empty() {
            let joined = format!("{head}{last_piece}{tail}");
            self.set_block_text(id, joined);
            return Some(BlockRange::single(id));
        }

        let first_text = format!("{head}{}", pieces[0]);
        let mut new_lines: Vec<String> = pieces[1..].iter().map(|piece| piece.to_string()).collect();
        new_lines.push(format!("{last_piece}{tail}"));

        if let Some(block) = self.blocks.get_mut(id) {
            block.set_text(first_text);
        }

        let new_ids: Vec<BlockId> = new_lines
            .into_iter()
            .map(|line| self.blocks.insert(Block::new(line)))
            .collect();
        let last = new_ids.last().copied().unwrap_or(id);
        self.order.splice(position + 1..position + 1, new_ids);
        self.reindex_from(position + 1);

        let range = BlockRange::new(id, last);
        self.record(DocumentEdit::Changed(range));
        Some(range)
    }

    /// Split a block at a byte column (a newline typed there).
    /// Returns the id of the new second half.
    pub fn split_block(&mut self, id: BlockId, col: usize) -> Option<BlockId> {
        self.insert_text(id, col, "\n").map(|range| range.last)
    }

    /// Merge the following block into this one (a newline deleted at the end)
    pub fn join_with_next(&mut self, id: BlockId) -> bool {
        let Some(position) = self.position(id) else {
            return false;
        };
        let Some(next) = self.id_at(position + 1) else {
            return false;
        };
        let Some(next_block) = self.blocks.remove(next) else {
            return false;
        };
        self.order.remove(position + 1);
        self.reindex_from(position + 1);

        if let Some(block) = self.blocks.get_mut(id) {
            block.push_str(next_block.text());
        }

        self.edits.push(DocumentEdit::Removed(next));
        self.record(DocumentEdit::Changed(BlockRange::single(id)));
        true
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (_, block)) in self.blocks().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(block.text())?;
        }
        Ok(())
    }
}

impl BlockSource for Document {
    fn block_count(&self) -> usize {
        Document::block_count(self)
    }

    fn id_at(&self, position: usize) -> Option<BlockId> {
        Document::id_at(self, position)
    }

    fn position(&self, id: BlockId) -> Option<usize> {
        Document::position(self, id)
    }

    fn text(&self, id: BlockId) -> Option<&str> {
        Document::text(self, id)
    }

    fn contains(&self, id: BlockId) -> bool {
        Document::contains(self, id)
    }
}

impl BlockStore for Document {
    fn store_spans(&mut self, id: BlockId, spans: Vec<Span>) -> bool {
        match self.blocks.get_mut(id) {
            Some(block) => {
                block.set_spans(spans);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(doc: &Document) -> Vec<String> {
        doc.blocks().map(|(_, b)| b.text().to_string()).collect()
    }

    #[test]
    fn test_new_document_has_one_empty_block() {
        let doc = Document::new();
        assert_eq!(doc.block_count(), 1);
        assert_eq!(lines(&doc), vec![""]);
    }

    #[test]
    fn test_with_text_splits_lines() {
        let doc = Document::with_text("a\r\nb\nc");
        assert_eq!(lines(&doc), vec!["a", "b", "c"]);
        assert_eq!(doc.to_string(), "a\nb\nc");
    }

    #[test]
    fn test_trailing_newline_yields_empty_block() {
        let doc = Document::with_text("a\n");
        assert_eq!(lines(&doc), vec!["a", ""]);
    }

    #[test]
    fn test_insert_text_without_newline() {
        let mut doc = Document::with_text("hello");
        let id = doc.id_at(0).unwrap();
        let range = doc.insert_text(id, 5, " world").unwrap();
        assert_eq!(range, BlockRange::single(id));
        assert_eq!(lines(&doc), vec!["hello world"]);
    }

    #[test]
    fn test_insert_text_with_newlines_splits() {
        let mut doc = Document::with_text("abcd\nz");
        let id = doc.id_at(0).unwrap();
        let range = doc.insert_text(id, 2, "1\n2\n3").unwrap();
        assert_eq!(lines(&doc), vec!["ab1", "2", "3cd", "z"]);
        assert_eq!(range.first, id);
        assert_eq!(doc.position(range.last), Some(2));
    }

    #[test]
    fn test_split_and_join() {
        let mut doc = Document::with_text("hello world");
        let id = doc.id_at(0).unwrap();
        let second = doc.split_block(id, 5).unwrap();
        assert_eq!(lines(&doc), vec!["hello", " world"]);

        assert!(doc.join_with_next(id));
        assert_eq!(lines(&doc), vec!["hello world"]);
        assert!(!doc.contains(second));
        assert!(!doc.join_with_next(id), "no next block to join");
    }

    #[test]
    fn test_remove_last_block_clears_it() {
        let mut doc = Document::with_text("only");
        let id = doc.id_at(0).unwrap();
        assert!(doc.remove_block(id));
        assert!(doc.contains(id));
        assert_eq!(lines(&doc), vec![""]);
    }

    #[test]
    fn test_edits_are_queued_and_drained() {
        let mut doc = Document::with_text("a\nb");
        let a = doc.id_at(0).unwrap();
        let b = doc.id_at(1).unwrap();
        doc.set_block_text(a, "x");
        doc.remove_block(b);

        assert_eq!(
            doc.take_edits(),
            vec![
                DocumentEdit::Changed(BlockRange::single(a)),
                DocumentEdit::Removed(b),
            ]
        );
        assert!(!doc.has_pending_edits());
        assert_eq!(doc.revision, 2);
    }

    #[test]
    fn test_store_spans_on_stale_id_fails() {
        let mut doc = Document::with_text("a\nb");
        let b = doc.id_at(1).unwrap();
        doc.remove_block(b);
        assert!(!doc.store_spans(b, vec![Span::new(0, 1, 0)]));
    }
}
