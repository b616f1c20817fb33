//! Addressable set of running report sessions.
//!
//! Each added session gets a [`ReportId`] and is driven on the tokio
//! runtime. Every progress step publishes the id on the update channel so
//! a viewer can re-read [`ReportRegistry::content`].

use crate::document::DocumentSource;
use crate::error::Result;
use crate::location::Location;
use crate::session::{SessionHandle, XrefsSession};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Scheme used for report addresses.
pub const DEFAULT_SCHEME: &str = "xrefs-result";

/// Identifier of a report within its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReportId(u64);

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Running and finished report sessions, addressable by id.
pub struct ReportRegistry {
    scheme: String,
    next_id: AtomicU64,
    sessions: Mutex<HashMap<ReportId, SessionHandle>>,
    updates: UnboundedSender<ReportId>,
    documents: Arc<dyn DocumentSource>,
}

impl ReportRegistry {
    /// Create a registry and the receiving end of its update channel.
    pub fn new(
        scheme: impl Into<String>,
        documents: Arc<dyn DocumentSource>,
    ) -> (Self, UnboundedReceiver<ReportId>) {
        let (updates, receiver) = unbounded_channel();
        let registry = Self {
            scheme: scheme.into(),
            next_id: AtomicU64::new(0),
            sessions: Mutex::new(HashMap::new()),
            updates,
            documents,
        };
        (registry, receiver)
    }

    /// Register `session` and start it on the current tokio runtime.
    ///
    /// Must be called from within a runtime.
    pub fn add<F>(&self, session: XrefsSession, references: F) -> ReportId
    where
        F: Future<Output = Result<Vec<Location>>> + Send + 'static,
    {
        let id = ReportId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.sessions.lock().insert(id, session.handle());

        let documents = self.documents.clone();
        let updates = self.updates.clone();
        tokio::spawn(async move {
            let notify = move || {
                // The viewer may be gone; updates are best effort.
                let _ = updates.send(id);
            };
            if let Err(e) = session.start(references, documents.as_ref(), notify).await {
                log::warn!("Report {} failed: {}", id, e);
            }
        });
        id
    }

    /// Address of a report, e.g. `xrefs-result:0.code-search`.
    pub fn uri(&self, id: ReportId) -> String {
        format!("{}:{}.code-search", self.scheme, id)
    }

    /// Find the report addressed by `uri`.
    pub fn resolve(&self, uri: &str) -> Option<ReportId> {
        let rest = uri.strip_prefix(&self.scheme)?.strip_prefix(':')?;
        let number = rest.strip_suffix(".code-search")?.parse().ok()?;
        let id = ReportId(number);
        self.sessions.lock().contains_key(&id).then_some(id)
    }

    /// Handle of a registered session.
    pub fn handle(&self, id: ReportId) -> Option<SessionHandle> {
        self.sessions.lock().get(&id).cloned()
    }

    /// Current content of a report; `None` for unknown ids.
    pub fn content(&self, id: ReportId) -> Option<String> {
        self.handle(id).map(|handle| handle.content())
    }

    /// Stop a report and forget it.
    pub fn remove(&self, id: ReportId) {
        if let Some(handle) = self.sessions.lock().remove(&id) {
            handle.stop();
        }
    }

    /// Stop every registered session.
    pub fn dispose(&self) {
        for handle in self.sessions.lock().values() {
            handle.stop();
        }
    }
}

impl Drop for ReportRegistry {
    fn drop(&mut self) {
        self.dispose();
    }
}
