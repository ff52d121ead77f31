//! Set of blocks whose cached spans are stale
//!
//! Keyed by `BlockId`, never by position: positions shift under edits
//! elsewhere in the document, ids don't. Order is not tracked here; the
//! scheduler looks up each dirty block's position when it builds a batch.

use std::collections::HashSet;

use crate::model::BlockId;

#[derive(Debug, Clone, Default)]
pub struct DirtySet {
    ids: HashSet<BlockId>,
}

impl DirtySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a block dirty. Returns true if it was clean before.
    pub fn insert(&mut self, id: BlockId) -> bool {
        self.ids.insert(id)
    }

    /// Mark a block clean. Returns true if it was dirty.
    pub fn remove(&mut self, id: BlockId) -> bool {
        self.ids.remove(&id)
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Dirty ids in no particular order
    pub fn iter(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.ids.iter().copied()
    }

    /// Drop every id the predicate rejects (used to forget deleted blocks)
    pub fn retain(&mut self, mut keep: impl FnMut(BlockId) -> bool) {
        self.ids.retain(|&id| keep(id));
    }
}
