//! Document model - blocks, stable identities and edit notices
//!
//! The highlighter never touches `Document` directly; it goes through the
//! `BlockSource` / `BlockStore` capability traits so any line store with
//! stable ids can be highlighted.

pub mod block;
pub mod document;

pub use block::{Block, BlockArena, BlockId};
pub use document::{BlockRange, BlockSource, BlockStore, Document, DocumentEdit};
