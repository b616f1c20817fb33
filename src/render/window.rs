//! Context windows around references in one file.
//!
//! Each reference shows a few lines before and after it. Windows that touch
//! or overlap are merged; disjoint clusters are separated by a spacer line.

use crate::document::Document;
use crate::error::{Result, XrefsError};
use crate::location::Location;
use crate::render::RenderConfig;

/// Role of a displayed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Surrounding line shown for readability.
    Context,
    /// Start line of a reference.
    Reference,
    /// Blank separator between disjoint windows.
    Spacer,
}

/// One line of a rendered file block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    /// Line number (0-based).
    pub line_number: usize,

    /// Role of the line.
    pub kind: LineKind,

    /// Line text, empty for spacers.
    pub text: String,
}

/// Compute the display lines for one file.
///
/// `locations` must be sorted ascending by start position. The result is
/// sparse and sorted by line number; lines outside every window are omitted.
///
/// # Errors
/// `LineOutOfRange` if a reference starts past the end of the document;
/// nothing is marked in that case.
pub fn build_windows(
    locations: &[Location],
    doc: &Document,
    config: &RenderConfig,
) -> Result<Vec<DisplayLine>> {
    let line_count = doc.line_count();
    if let Some(stale) = locations
        .iter()
        .find(|l| l.range.start.line >= line_count)
    {
        return Err(XrefsError::LineOutOfRange {
            file: doc.path().to_path_buf(),
            line: stale.range.start.line,
            line_count,
        });
    }

    let mut marks: Vec<Option<LineKind>> = Vec::new();
    let mut mark = |line: usize, kind: LineKind| {
        if marks.len() <= line {
            marks.resize(line + 1, None);
        }
        marks[line] = Some(kind);
    };

    // Exclusive end of the lines covered by windows so far.
    let mut covered_until = 0;
    for (index, location) in locations.iter().enumerate() {
        let start = location.range.start.line;
        let first = start.saturating_sub(config.context_before);
        let end = location
            .range
            .end
            .line
            .saturating_add(config.context_after)
            .saturating_add(1)
            .min(line_count);

        if index > 0 {
            let spacer = start.saturating_sub(config.context_before.saturating_add(1));
            if spacer >= covered_until {
                mark(spacer, LineKind::Spacer);
            }
        }
        for line in first..end {
            mark(line, LineKind::Context);
        }
        covered_until = covered_until.max(end);
    }

    // References win over context and spacers.
    for location in locations {
        mark(location.range.start.line, LineKind::Reference);
    }

    marks
        .into_iter()
        .enumerate()
        .filter_map(|(line_number, kind)| kind.map(|kind| (line_number, kind)))
        .map(|(line_number, kind)| {
            let text = match kind {
                LineKind::Spacer => String::new(),
                LineKind::Context | LineKind::Reference => doc.line(line_number)?,
            };
            Ok(DisplayLine {
                line_number,
                kind,
                text,
            })
        })
        .collect()
}
