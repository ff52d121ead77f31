//! Utility modules

pub mod text;

pub use text::{floor_char_boundary, split_lines, trim_line_ending};
