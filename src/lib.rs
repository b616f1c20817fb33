//! Xrefs: classified cross-reference reports.
//!
//! Given the locations of every use of an identifier, this library
//! classifies each occurrence as a read, a write or an import using the
//! Python syntax tree, and renders the occurrences grouped by file with
//! surrounding context into a report that grows while results arrive.

#![warn(missing_docs)]
// env_logger is used by src/main.rs (binary), not this library
#![expect(unused_crate_dependencies)]

pub mod classify;
pub mod cli;
pub mod document;
pub mod error;
pub mod location;
pub mod render;
pub mod search;
pub mod session;
pub mod syntax;

/// Re-export common error types for convenience.
pub use error::{Result, XrefsError};

/// Re-export the classifier entry points for convenience.
pub use classify::{classify, XrefKind};

/// Xrefs version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
