//! Document access.
//!
//! Documents are fetched asynchronously through [`DocumentSource`] and give
//! line-level access to their text. Lines are 0-indexed.

use crate::error::{Result, XrefsError};
use async_trait::async_trait;
use parking_lot::Mutex;
use ropey::Rope;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The text of one source file.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    rope: Rope,
}

impl Document {
    /// Create a document from its path and full text.
    pub fn new(path: impl Into<PathBuf>, text: &str) -> Self {
        Self {
            path: path.into(),
            rope: Rope::from_str(text),
        }
    }

    /// Path of the document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of lines.
    ///
    /// Text ending in a newline has a final empty line, like editors count.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Text of `line` without its line terminator.
    pub fn line(&self, line: usize) -> Result<String> {
        if line >= self.line_count() {
            return Err(XrefsError::LineOutOfRange {
                file: self.path.clone(),
                line,
                line_count: self.line_count(),
            });
        }
        let text = self.rope.line(line).to_string();
        Ok(text.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Full text of the document.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }
}

/// Provider of document contents.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Open the document for `file`.
    async fn open(&self, file: &Path) -> Result<Arc<Document>>;
}

/// Documents read from the filesystem, cached after the first read.
#[derive(Debug, Default)]
pub struct FsDocuments {
    cache: Mutex<HashMap<PathBuf, Arc<Document>>>,
}

impl FsDocuments {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentSource for FsDocuments {
    async fn open(&self, file: &Path) -> Result<Arc<Document>> {
        let cached = self.cache.lock().get(file).cloned();
        if let Some(doc) = cached {
            return Ok(doc);
        }

        let text = tokio::fs::read_to_string(file).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                XrefsError::DocumentNotFound(file.to_path_buf())
            } else {
                XrefsError::io(file, e)
            }
        })?;
        log::debug!("Loaded {} ({} bytes)", file.display(), text.len());

        let doc = Arc::new(Document::new(file, &text));
        self.cache.lock().insert(file.to_path_buf(), doc.clone());
        Ok(doc)
    }
}

/// Documents held in memory, keyed by path.
#[derive(Debug, Default)]
pub struct MemoryDocuments {
    docs: HashMap<PathBuf, Arc<Document>>,
}

impl MemoryDocuments {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document with the given text.
    pub fn with(mut self, path: impl Into<PathBuf>, text: &str) -> Self {
        let path = path.into();
        self.docs
            .insert(path.clone(), Arc::new(Document::new(path, text)));
        self
    }
}

#[async_trait]
impl DocumentSource for MemoryDocuments {
    async fn open(&self, file: &Path) -> Result<Arc<Document>> {
        self.docs
            .get(file)
            .cloned()
            .ok_or_else(|| XrefsError::DocumentNotFound(file.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_access() {
        let doc = Document::new("a.py", "a = 1\r\nb = a\n");
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.line(0).unwrap(), "a = 1");
        assert_eq!(doc.line(1).unwrap(), "b = a");
        assert_eq!(doc.line(2).unwrap(), "");
        assert!(matches!(
            doc.line(3),
            Err(XrefsError::LineOutOfRange { line: 3, .. })
        ));
    }

    #[tokio::test]
    async fn test_fs_documents_cache_and_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("m.py");
        std::fs::write(&path, "x = 1\n").expect("write");

        let docs = FsDocuments::new();
        let first = docs.open(&path).await.expect("open");
        std::fs::write(&path, "changed\n").expect("rewrite");
        let second = docs.open(&path).await.expect("open again");
        assert!(Arc::ptr_eq(&first, &second));

        let missing = docs.open(&dir.path().join("nope.py")).await;
        assert!(matches!(missing, Err(XrefsError::DocumentNotFound(_))));
    }
}
