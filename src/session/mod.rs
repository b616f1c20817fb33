//! Incrementally updating xref reports.
//!
//! A session consumes one asynchronous location search and renders its
//! results file by file, publishing partial content as it goes. Consumers
//! read the content through a [`SessionHandle`] at any time; the content only
//! ever grows until the session is replaced.
//!
//! # Lifecycle
//! `Pending` → `Streaming` → `Done`, or `Failed` if the search or a file
//! group fails. Cancellation through [`SessionHandle::stop`] is orthogonal:
//! it is checked before each file group and ends the session as `Done`.

pub mod registry;

pub use registry::{ReportId, ReportRegistry};

use crate::document::DocumentSource;
use crate::error::Result;
use crate::location::{group_by_file, Location};
use crate::render::{render_group, summary_line, RenderConfig, XrefOptions};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Reference and file counts shown in the summary line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderStats {
    /// Files with at least one shown reference.
    pub files: usize,

    /// References shown.
    pub refs: usize,
}

/// Progress of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the location search.
    Pending,
    /// Rendering file groups.
    Streaming,
    /// Finished, normally or after a stop.
    Done,
    /// The search or a file group failed.
    Failed(String),
}

#[derive(Debug)]
struct SessionState {
    stats: Option<HeaderStats>,
    blocks: Vec<String>,
    phase: Phase,
}

#[derive(Debug)]
struct Shared {
    state: Mutex<SessionState>,
    cancel: CancellationToken,
    options: XrefOptions,
}

/// A report session, consumed by [`XrefsSession::start`].
#[derive(Debug)]
pub struct XrefsSession {
    shared: Arc<Shared>,
    config: RenderConfig,
}

/// Read and stop access to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    shared: Arc<Shared>,
}

impl XrefsSession {
    /// Create a session that has not started searching yet.
    pub fn new(options: XrefOptions, config: RenderConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(SessionState {
                    stats: None,
                    blocks: Vec::new(),
                    phase: Phase::Pending,
                }),
                cancel: CancellationToken::new(),
                options,
            }),
            config,
        }
    }

    /// Handle for reading content and stopping the session.
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            shared: self.shared.clone(),
        }
    }

    /// Await the location search and render its results.
    ///
    /// File groups are processed one at a time. `on_progress` fires once
    /// the search resolves, after every group, and once more when the
    /// session ends.
    ///
    /// # Errors
    /// Returns the search error or the first failing group's error, after
    /// moving the session to [`Phase::Failed`].
    pub async fn start<F, P>(
        self,
        references: F,
        documents: &dyn DocumentSource,
        mut on_progress: P,
    ) -> Result<()>
    where
        F: Future<Output = Result<Vec<Location>>> + Send,
        P: FnMut() + Send,
    {
        let locations = match references.await {
            Ok(locations) => locations,
            Err(e) => {
                self.fail(&e);
                on_progress();
                return Err(e);
            }
        };

        let groups = group_by_file(&locations);
        let filtered = self.shared.options.only_kind.is_some();
        {
            let mut state = self.shared.state.lock();
            state.stats = Some(if filtered {
                HeaderStats::default()
            } else {
                HeaderStats {
                    files: groups.len(),
                    refs: locations.len(),
                }
            });
            state.phase = Phase::Streaming;
        }
        log::debug!(
            "Search returned {} locations in {} files",
            locations.len(),
            groups.len()
        );
        on_progress();

        for group in &groups {
            if self.shared.cancel.is_cancelled() {
                log::debug!("Session stopped before {}", group.file.display());
                break;
            }

            let rendered =
                match render_group(group, &self.shared.options, &self.config, documents).await {
                    Ok(rendered) => rendered,
                    Err(e) => {
                        log::error!("Failed to render {}: {}", group.file.display(), e);
                        self.fail(&e);
                        on_progress();
                        return Err(e);
                    }
                };

            {
                let mut state = self.shared.state.lock();
                if filtered && rendered.reference_count > 0 {
                    if let Some(stats) = state.stats.as_mut() {
                        stats.files += 1;
                        stats.refs += rendered.reference_count;
                    }
                }
                state.blocks.push(rendered.text);
            }
            on_progress();
        }

        self.shared.state.lock().phase = Phase::Done;
        on_progress();
        Ok(())
    }

    fn fail(&self, error: &crate::error::XrefsError) {
        self.shared.state.lock().phase = Phase::Failed(error.to_string());
    }
}

impl SessionHandle {
    /// Ask the session not to start any further file group.
    ///
    /// Idempotent; blocks already rendered stay.
    pub fn stop(&self) {
        self.shared.cancel.cancel();
    }

    /// Whether [`SessionHandle::stop`] was called.
    pub fn is_stopped(&self) -> bool {
        self.shared.cancel.is_cancelled()
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.shared.state.lock().phase.clone()
    }

    /// Whether the session finished normally or after a stop.
    pub fn is_done(&self) -> bool {
        self.phase() == Phase::Done
    }

    /// Current summary counts, `None` until the search resolves.
    pub fn stats(&self) -> Option<HeaderStats> {
        self.shared.state.lock().stats
    }

    /// Number of rendered file blocks.
    pub fn block_count(&self) -> usize {
        self.shared.state.lock().blocks.len()
    }

    /// The report as rendered so far.
    ///
    /// Empty until the search resolves.
    pub fn content(&self) -> String {
        let state = self.shared.state.lock();
        let Some(stats) = state.stats else {
            return String::new();
        };

        let mut parts = Vec::with_capacity(state.blocks.len() + 2);
        parts.push(summary_line(
            stats.refs,
            stats.files,
            self.shared.options.only_kind,
        ));
        match &state.phase {
            Phase::Done => {}
            Phase::Failed(message) => parts.push(format!("Failed: {}\n", message)),
            Phase::Pending | Phase::Streaming => parts.push("Searching for more...\n".to_string()),
        }
        parts.extend(state.blocks.iter().cloned());
        parts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::XrefKind;
    use crate::document::MemoryDocuments;
    use crate::error::XrefsError;
    use std::future::{ready, Ready};

    fn resolved(locations: Vec<Location>) -> Ready<Result<Vec<Location>>> {
        ready(Ok(locations))
    }

    #[tokio::test]
    async fn test_content_empty_before_start() {
        let session = XrefsSession::new(XrefOptions::default(), RenderConfig::default());
        let handle = session.handle();
        assert_eq!(handle.content(), "");
        assert_eq!(handle.phase(), Phase::Pending);
    }

    #[tokio::test]
    async fn test_zero_references() {
        let session = XrefsSession::new(XrefOptions::default(), RenderConfig::default());
        let handle = session.handle();
        let docs = MemoryDocuments::new();
        session
            .start(resolved(Vec::new()), &docs, || {})
            .await
            .unwrap();
        assert_eq!(handle.content(), "Found 0 xrefs in 0 files.\n");
        assert!(handle.is_done());
    }

    #[tokio::test]
    async fn test_filtered_counts_grow_per_group() {
        let docs = MemoryDocuments::new()
            .with("a.py", "a = 1\nprint(a)\n")
            .with("b.py", "print(a)\n");
        let locations = vec![
            Location::on_line("a.py", 0, 0, 1),
            Location::on_line("a.py", 1, 6, 7),
            Location::on_line("b.py", 0, 6, 7),
        ];
        let session = XrefsSession::new(XrefOptions::only(XrefKind::Write), RenderConfig::default());
        let handle = session.handle();

        let mut seen = Vec::new();
        let observer = handle.clone();
        session
            .start(resolved(locations), &docs, || seen.push(observer.stats()))
            .await
            .unwrap();

        assert_eq!(
            seen,
            vec![
                Some(HeaderStats { files: 0, refs: 0 }),
                Some(HeaderStats { files: 1, refs: 1 }),
                Some(HeaderStats { files: 1, refs: 1 }),
                Some(HeaderStats { files: 1, refs: 1 }),
            ]
        );
        let content = handle.content();
        assert!(content.starts_with("Found 1 write-xrefs in 1 files.\n\na.py:\n"));
        // b.py has no writes: its header stays, its counts do not.
        assert!(content.ends_with("  3  \n\nb.py:\n"));
        assert_eq!(handle.block_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_search_is_terminal() {
        let session = XrefsSession::new(XrefOptions::default(), RenderConfig::default());
        let handle = session.handle();
        let docs = MemoryDocuments::new();
        let err = session
            .start(
                ready(Err(XrefsError::Search("provider crashed".to_string()))),
                &docs,
                || {},
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "SearchFailed");
        assert!(matches!(handle.phase(), Phase::Failed(_)));
        assert!(!handle.is_done());
        assert_eq!(handle.content(), "");
    }

    #[tokio::test]
    async fn test_failed_group_is_reported_in_content() {
        let docs = MemoryDocuments::new().with("a.py", "a = 1\n");
        let locations = vec![
            Location::on_line("a.py", 0, 0, 1),
            Location::on_line("gone.py", 3, 0, 1),
        ];
        let session = XrefsSession::new(XrefOptions::default(), RenderConfig::default());
        let handle = session.handle();
        let result = session.start(resolved(locations), &docs, || {}).await;

        assert!(result.is_err());
        let content = handle.content();
        assert!(content.starts_with("Found 2 xrefs in 2 files.\n\nFailed: "));
        assert!(!content.contains("Search failed"));
        assert!(content.contains("a.py:\n  1: a = 1\n"));
        assert_eq!(handle.block_count(), 1);
    }
}
