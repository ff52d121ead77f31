//! Blocks and the generation-tagged arena that owns them
//!
//! A `BlockId` names one line for as long as that line exists. Positions
//! shift under insertions and deletions elsewhere in the document, ids
//! don't. Freed slots are reused with a bumped generation, so an id held
//! past its block's deletion never resolves to the line that took the slot.

use std::fmt;

use crate::syntax::Span;

/// Stable handle to a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId {
    index: u32,
    generation: u32,
}

impl BlockId {
    /// Arena slot this id points at
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot when this id was handed out
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// One line of a document
#[derive(Debug, Clone, Default)]
pub struct Block {
    text: String,
    /// Incremented on every text change
    revision: u64,
    /// Spans from the last highlight pass (possibly stale, see the scheduler)
    spans: Vec<Span>,
}

impl Block {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            revision: 0,
            spans: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Cached spans, without any freshness guarantee
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub(crate) fn set_text(&mut self, text: String) {
        self.text = text;
        self.revision += 1;
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
        self.revision += 1;
    }

    pub(crate) fn set_spans(&mut self, spans: Vec<Span>) {
        self.spans = spans;
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    block: Option<Block>,
}

/// Slot storage for blocks with free-list reuse
#[derive(Debug, Clone, Default)]
pub struct BlockArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl BlockArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, block: Block) -> BlockId {
        self.len += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.block = Some(block);
            return BlockId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            block: Some(block),
        });
        BlockId {
            index,
            generation: 0,
        }
    }

    /// Remove a block, invalidating `id` and every copy of it
    pub fn remove(&mut self, id: BlockId) -> Option<Block> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let block = slot.block.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(block)
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.block.as_ref())
    }

    pub fn get_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.block.as_mut())
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut arena = BlockArena::new();
        let a = arena.insert(Block::new("a"));
        let b = arena.insert(Block::new("b"));
        assert_ne!(a, b);
        assert_eq!(arena.get(a).unwrap().text(), "a");
        assert_eq!(arena.get(b).unwrap().text(), "b");
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_removed_id_is_stale() {
        let mut arena = BlockArena::new();
        let a = arena.insert(Block::new("a"));
        assert_eq!(arena.remove(a).unwrap().text(), "a");
        assert!(arena.get(a).is_none());
        assert!(arena.remove(a).is_none());
        assert!(arena.is_empty());
    }

    #[test]
    fn test_reused_slot_gets_new_generation() {
        let mut arena = BlockArena::new();
        let a = arena.insert(Block::new("a"));
        arena.remove(a);
        let b = arena.insert(Block::new("b"));

        assert_eq!(a.index(), b.index());
        assert_ne!(a.generation(), b.generation());
        assert!(arena.get(a).is_none(), "stale id must not see the new block");
        assert_eq!(arena.get(b).unwrap().text(), "b");
    }

    #[test]
    fn test_set_text_bumps_revision() {
        let mut block = Block::new("x");
        assert_eq!(block.revision(), 0);
        block.set_text("y".to_string());
        block.push_str("z");
        assert_eq!(block.text(), "yz");
        assert_eq!(block.revision(), 2);
    }

    #[test]
    fn test_display_format() {
        let mut arena = BlockArena::new();
        let a = arena.insert(Block::new(""));
        assert_eq!(a.to_string(), "#0v0");
    }
}
