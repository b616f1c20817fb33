//! Text rendering of classified references.
//!
//! A report is a summary line followed by one block per file:
//!
//! ```text
//! Found 3 xrefs in 2 files.
//!
//! a.py:
//!   1: a = 1
//!   2  b = 2
//!   3: print(a)
//!
//! b.py:
//!   4  import os
//!   5: a += 1
//! ```
//!
//! Context lines use two spaces after the number, reference lines use a
//! colon. Line numbers are 1-based and right-aligned within a block.

pub mod stream;
pub mod window;

pub use stream::{render_all, ReportStream};
pub use window::{build_windows, DisplayLine, LineKind};

use crate::classify::{classify, XrefKind};
use crate::document::{Document, DocumentSource};
use crate::error::{Result, XrefsError};
use crate::location::{Location, ReferenceGroup};
use crate::syntax::{node_at, parse_python};
use std::path::{Path, PathBuf};

/// Context lines shown around each reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Lines shown before a reference's start line.
    pub context_before: usize,

    /// Lines shown after a reference's end line.
    pub context_after: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            context_before: 2,
            context_after: 2,
        }
    }
}

/// What to include in a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct XrefOptions {
    /// Keep only references of this kind.
    pub only_kind: Option<XrefKind>,
}

impl XrefOptions {
    /// Options keeping only `kind`.
    pub fn only(kind: XrefKind) -> Self {
        Self {
            only_kind: Some(kind),
        }
    }
}

/// The rendered block of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedGroup {
    /// The file the block belongs to.
    pub file: PathBuf,

    /// Number of references shown in the block.
    pub reference_count: usize,

    /// Block text, ending in a newline.
    pub text: String,
}

/// Summary line of a report.
///
/// With a kind filter the kind is used as a prefix, e.g. `write-xrefs`.
pub fn summary_line(refs: usize, files: usize, kind: Option<XrefKind>) -> String {
    let prefix = kind.map(|k| format!("{}-", k)).unwrap_or_default();
    format!("Found {} {}xrefs in {} files.\n", refs, prefix, files)
}

/// Render one file's references.
///
/// A kind filter that leaves no references in the file still yields the
/// file's header line, with a `reference_count` of zero.
///
/// # Errors
/// * `DocumentNotFound` / `Io` if the document cannot be opened.
/// * `Parse` if the document cannot be parsed for classification.
/// * `Classification` if any reference cannot be classified; the whole
///   group fails rather than silently dropping that reference.
pub async fn render_group(
    group: &ReferenceGroup,
    options: &XrefOptions,
    config: &RenderConfig,
    documents: &dyn DocumentSource,
) -> Result<RenderedGroup> {
    let doc = documents.open(&group.file).await?;
    let mut locations = group.sorted_locations();

    if let Some(kind) = options.only_kind {
        locations = filter_by_kind(&doc, locations, kind)?;
        log::debug!(
            "{}: {} of {} references are {}",
            group.file.display(),
            locations.len(),
            group.locations.len(),
            kind
        );
    }

    let lines = build_windows(&locations, &doc, config)?;
    Ok(RenderedGroup {
        file: group.file.clone(),
        reference_count: locations.len(),
        text: format_block(&group.file, &lines),
    })
}

/// Keep only the locations whose identifier classifies as `kind`.
pub fn filter_by_kind(
    doc: &Document,
    locations: Vec<Location>,
    kind: XrefKind,
) -> Result<Vec<Location>> {
    let tree = parse_python(doc.path(), &doc.text())?;

    let mut retained = Vec::with_capacity(locations.len());
    for location in locations {
        let start = location.start();
        let classified = node_at(&tree, start)
            .ok_or_else(|| XrefsError::NodeResolution {
                file: doc.path().to_path_buf(),
                line: start.line,
                column: start.column,
            })
            .and_then(|node| classify(&node));

        match classified {
            Ok(found) if found == kind => retained.push(location),
            Ok(_) => {}
            Err(e) => {
                return Err(XrefsError::classification(
                    doc.path(),
                    start.line,
                    start.column,
                    e,
                ))
            }
        }
    }
    Ok(retained)
}

/// Format a file block from its display lines.
pub fn format_block(path: &Path, lines: &[DisplayLine]) -> String {
    let width = lines
        .iter()
        .filter(|l| l.kind != LineKind::Spacer)
        .map(|l| (l.line_number + 1).to_string().len())
        .max()
        .unwrap_or(1);

    let mut out = Vec::with_capacity(lines.len() + 2);
    out.push(format!("{}:", path.display()));
    for line in lines {
        let number = line.line_number + 1;
        match line.kind {
            LineKind::Spacer => out.push(String::new()),
            LineKind::Context => out.push(format!("  {:>width$}  {}", number, line.text)),
            LineKind::Reference => out.push(format!("  {:>width$}: {}", number, line.text)),
        }
    }
    out.push(String::new());
    out.join("\n")
}
