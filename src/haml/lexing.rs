//! Lexing
//!
//! Line-level recognition for haml sources. Nothing here builds a tree: each function looks at
//! one line (or one attribute region) in isolation.
//!
//! - [`line_classification`]: what kind of line this is (element head, control marker, text…)
//! - [`segmentation`]: splitting text on `{{ expr }}` insertions
//! - [`scanner`]: brace depth and backtick tracking shared by everything that scans attributes

pub mod line_classification;
pub mod scanner;
pub mod segmentation;

pub use line_classification::{classify_line, Directive, ElementHead};
pub use scanner::{find_block_end, find_top_level, split_top_level, ScanState};
pub use segmentation::{segment, Segment};

/// Number of leading whitespace characters of `line`.
pub fn indent_of(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}
