//! Xrefs error types.
//!
//! All errors are typed and provide root cause information.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for xref classification and rendering.
#[derive(Error, Debug)]
pub enum XrefsError {
    /// I/O error during file operations.
    #[error("I/O error for path {path}: {source}")]
    Io {
        /// The file path that caused the I/O error.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The classifier was handed a node that is not an identifier.
    #[error("Invalid argument: expected an identifier node, got '{kind}'")]
    InvalidArgument {
        /// Kind of the node that was passed in.
        kind: String,
    },

    /// Tree-sitter parsing error.
    #[error("Parse error in {file}: {message}")]
    Parse {
        /// The file that failed to parse.
        file: PathBuf,
        /// The parse error message.
        message: String,
    },

    /// A reference position does not resolve to any syntax node.
    #[error("No syntax node at {file}:{line}:{column}")]
    NodeResolution {
        /// File containing the reference.
        file: PathBuf,
        /// Line number (0-based).
        line: usize,
        /// Column number (0-based, in bytes).
        column: usize,
    },

    /// Classification of a reference failed; aborts the whole file group.
    #[error("Failed to classify reference at {file}:{line}:{column}: {source}")]
    Classification {
        /// File containing the reference.
        file: PathBuf,
        /// Line number (0-based).
        line: usize,
        /// Column number (0-based, in bytes).
        column: usize,
        /// The underlying failure.
        #[source]
        source: Box<XrefsError>,
    },

    /// The ancestor walk met a decisive construct it could not account for.
    #[error("Unclassifiable '{ancestor}' child of kind '{child}'")]
    ClassificationExhaustion {
        /// Kind of the decisive ancestor.
        ancestor: &'static str,
        /// Kind of the child the walk came from.
        child: String,
    },

    /// A reference line lies outside the document.
    #[error("Line {line} is out of range for {file} ({line_count} lines)")]
    LineOutOfRange {
        /// The document path.
        file: PathBuf,
        /// Requested line (0-based).
        line: usize,
        /// Number of lines in the document.
        line_count: usize,
    },

    /// Document could not be provided.
    #[error("Document not found: {0}")]
    DocumentNotFound(PathBuf),

    /// The location search failed.
    #[error("Location search failed: {0}")]
    Search(String),

    /// UTF-8 validation error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{0}")]
    Other(String),
}

impl XrefsError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        XrefsError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Wrap a failure as a classification error for one reference.
    pub fn classification(file: &Path, line: usize, column: usize, source: XrefsError) -> Self {
        XrefsError::Classification {
            file: file.to_path_buf(),
            line,
            column,
            source: Box::new(source),
        }
    }

    /// Stable identifier of the error kind, used in JSON payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            XrefsError::Io { .. } => "Io",
            XrefsError::InvalidArgument { .. } => "InvalidArgument",
            XrefsError::Parse { .. } => "ParseFailure",
            XrefsError::NodeResolution { .. } => "NodeResolutionFailure",
            XrefsError::Classification { .. } => "ClassificationFailure",
            XrefsError::ClassificationExhaustion { .. } => "ClassificationExhaustionFailure",
            XrefsError::LineOutOfRange { .. } => "LineOutOfRange",
            XrefsError::DocumentNotFound(_) => "DocumentNotFound",
            XrefsError::Search(_) => "SearchFailed",
            XrefsError::Utf8(_) => "Utf8",
            XrefsError::Json(_) => "Json",
            XrefsError::Other(_) => "Other",
        }
    }

    /// File the error refers to, if any.
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            XrefsError::Io { path, .. } => Some(path),
            XrefsError::Parse { file, .. }
            | XrefsError::NodeResolution { file, .. }
            | XrefsError::Classification { file, .. }
            | XrefsError::LineOutOfRange { file, .. } => Some(file),
            XrefsError::DocumentNotFound(path) => Some(path),
            _ => None,
        }
    }

    /// Remediation hint for the user, if one applies.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            XrefsError::NodeResolution { .. } | XrefsError::LineOutOfRange { .. } => {
                Some("The file changed since the locations were computed; search again.")
            }
            XrefsError::Classification { source, .. } => source.hint(),
            XrefsError::ClassificationExhaustion { .. } => {
                Some("This is a classifier defect; please report the snippet.")
            }
            XrefsError::Parse { .. } => Some("Only Python sources can be classified."),
            _ => None,
        }
    }
}

/// Result type alias for xrefs operations.
pub type Result<T> = std::result::Result<T, XrefsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_wraps_cause() {
        let cause = XrefsError::NodeResolution {
            file: PathBuf::from("a.py"),
            line: 3,
            column: 1,
        };
        let err = XrefsError::classification(Path::new("a.py"), 3, 1, cause);
        assert_eq!(err.kind(), "ClassificationFailure");
        assert_eq!(err.file_path(), Some(Path::new("a.py")));
        assert!(err.hint().is_some());
        assert!(err.to_string().contains("a.py:3:1"));
    }
}
