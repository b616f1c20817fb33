//! Lazily rendered reports.

use crate::document::DocumentSource;
use crate::error::Result;
use crate::location::{group_by_file, Location, ReferenceGroup};
use crate::render::{render_group, summary_line, RenderConfig, XrefOptions};

/// A report rendered one block at a time.
///
/// The first item is the summary line, then one block per file in the
/// order files were first seen. Files are only opened when their block is
/// requested, so a consumer that stops early never pays for the rest.
/// The stream is finite and cannot be restarted.
pub struct ReportStream<'a> {
    summary: Option<String>,
    groups: std::vec::IntoIter<ReferenceGroup>,
    options: XrefOptions,
    config: RenderConfig,
    documents: &'a dyn DocumentSource,
}

/// Start rendering a report over `locations`.
///
/// The summary counts every location and file, before any kind filter.
pub fn render_all<'a>(
    locations: &[Location],
    options: XrefOptions,
    config: RenderConfig,
    documents: &'a dyn DocumentSource,
) -> ReportStream<'a> {
    let groups = group_by_file(locations);
    ReportStream {
        summary: Some(summary_line(locations.len(), groups.len(), None)),
        groups: groups.into_iter(),
        options,
        config,
        documents,
    }
}

impl ReportStream<'_> {
    /// Produce the next piece of the report, `None` once exhausted.
    pub async fn next_block(&mut self) -> Option<Result<String>> {
        if let Some(summary) = self.summary.take() {
            return Some(Ok(summary));
        }

        let group = self.groups.next()?;
        Some(
            render_group(&group, &self.options, &self.config, self.documents)
                .await
                .map(|rendered| rendered.text),
        )
    }

    /// Number of file groups not yet rendered.
    pub fn remaining(&self) -> usize {
        self.groups.len()
    }

    /// Render everything that is left and join it into one text.
    pub async fn into_text(mut self) -> Result<String> {
        let mut parts = Vec::new();
        while let Some(block) = self.next_block().await {
            parts.push(block?);
        }
        Ok(parts.join("\n"))
    }
}
