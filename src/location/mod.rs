//! Reference locations as reported by a location search.
//!
//! Locations are plain values: this crate reads them, groups them and
//! renders them, but never mutates them.

pub mod group;

pub use group::{group_by_file, ReferenceGroup};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A position in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (0-based).
    pub line: usize,

    /// Column number (0-based, in bytes).
    pub column: usize,
}

impl Position {
    /// Create a position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A half-open span between two positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    /// Start of the span.
    pub start: Position,

    /// End of the span.
    pub end: Position,
}

/// One occurrence of an identifier in a file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File containing the occurrence.
    pub file: PathBuf,

    /// Span of the occurrence.
    pub range: Range,
}

impl Location {
    /// Create a location spanning `start..end` on a single line.
    pub fn on_line(file: impl Into<PathBuf>, line: usize, start: usize, end: usize) -> Self {
        Self {
            file: file.into(),
            range: Range {
                start: Position::new(line, start),
                end: Position::new(line, end),
            },
        }
    }

    /// Start position of the occurrence.
    pub fn start(&self) -> Position {
        self.range.start
    }
}
