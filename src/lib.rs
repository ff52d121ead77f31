//! rebel-highlight - incremental syntax highlighting
//!
//! This crate keeps the styling of a line-based document in step with its
//! text without ever spending more than a bounded slice of time per call:
//! edits mark blocks dirty, and `run_batch` rehighlights a bounded number
//! of them from an idle or timer callback.

pub mod buffer;
pub mod cli;
pub mod config;
pub mod config_paths;
pub mod model;
pub mod scheduler;
pub mod syntax;
pub mod tracing;
pub mod util;

// Re-export commonly used types
pub use buffer::HighlightedBuffer;
pub use config::HighlightConfig;
pub use model::{BlockId, BlockRange, Document};
pub use scheduler::{BatchReport, HighlightScheduler, SchedulerSettings};
pub use syntax::{LanguageId, RuleSet, Span};
