//! Command-line interface for xrefs.
//!
//! This module handles argument parsing and user interface only.
//! NO classification or rendering logic is performed here.

use clap::Parser;
use serde::Serialize;
use serde_json::Value;

/// Xrefs: find references and classify them as reads, writes or imports.
#[derive(Parser, Debug)]
#[command(name = "xrefs")]
#[command(author, version, about, long_about = None)]
#[command(subcommand_required = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print a JSON payload instead of plain text.
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available xrefs commands.
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Report every reference to the identifier at a position.
    Find {
        /// Python file containing the identifier.
        #[arg(short, long)]
        file: std::path::PathBuf,

        /// Line of the identifier (1-based).
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        line: u64,

        /// Column of the identifier (0-based, in bytes).
        #[arg(short, long, default_value_t = 0)]
        column: usize,

        /// Only report references of this kind.
        #[arg(short, long)]
        kind: Option<KindFilter>,

        /// Glob of further Python files to search by name.
        #[arg(short, long, conflicts_with = "locations")]
        glob: Option<String>,

        /// JSON file with pre-computed locations instead of a name search.
        #[arg(long, value_name = "FILE")]
        locations: Option<std::path::PathBuf>,

        /// Context lines before each reference.
        #[arg(long, default_value_t = 2)]
        before: usize,

        /// Context lines after each reference.
        #[arg(long, default_value_t = 2)]
        after: usize,
    },
}

/// Reference kind for filtering.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindFilter {
    /// Assignments and other bindings.
    Write,
    /// Plain uses.
    Read,
    /// Import statements.
    Import,
}

impl KindFilter {
    /// Convert to the classifier's kind.
    pub fn to_xref_kind(self) -> crate::classify::XrefKind {
        match self {
            KindFilter::Write => crate::classify::XrefKind::Write,
            KindFilter::Read => crate::classify::XrefKind::Read,
            KindFilter::Import => crate::classify::XrefKind::Import,
        }
    }
}

/// Parse command-line arguments.
///
/// This function is the entry point for CLI argument parsing.
/// It returns the parsed Cli struct or exits on error.
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// JSON success payload for CLI responses.
#[derive(Serialize)]
pub struct CliSuccessPayload {
    /// Status indicator ("ok").
    pub status: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Optional structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl CliSuccessPayload {
    /// Construct a payload with structured data.
    pub fn with_data(message: String, data: Value) -> Self {
        Self {
            status: "ok",
            message,
            data: Some(data),
        }
    }
}

/// JSON error payload for CLI responses.
#[derive(Serialize)]
pub struct CliErrorPayload {
    /// Status indicator ("error").
    pub status: &'static str,
    /// Structured error details.
    pub error: ErrorDetails,
}

/// Details for a CLI error payload.
#[derive(Serialize)]
pub struct ErrorDetails {
    /// Error kind identifier (ClassificationFailure, etc.).
    pub kind: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Optional file context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Optional hint for remediation steps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl CliErrorPayload {
    /// Build payload from an XrefsError instance.
    pub fn from_error(error: &crate::XrefsError) -> Self {
        CliErrorPayload {
            status: "error",
            error: ErrorDetails {
                kind: error.kind(),
                message: error.to_string(),
                file: error
                    .file_path()
                    .map(|path| path.to_string_lossy().to_string()),
                hint: error.hint().map(|h| h.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_find_command() {
        let cli = Cli::try_parse_from([
            "xrefs", "find", "--file", "m.py", "--line", "3", "--kind", "write", "--json",
        ])
        .expect("valid arguments");
        assert!(cli.json);
        match cli.command {
            Commands::Find {
                line, column, kind, before, ..
            } => {
                assert_eq!(line, 3);
                assert_eq!(column, 0);
                assert_eq!(kind, Some(KindFilter::Write));
                assert_eq!(before, 2);
            }
        }
    }

    #[test]
    fn test_line_zero_rejected() {
        assert!(Cli::try_parse_from(["xrefs", "find", "--file", "m.py", "--line", "0"]).is_err());
    }

    #[test]
    fn test_error_payload() {
        let err = crate::XrefsError::DocumentNotFound("gone.py".into());
        let json = serde_json::to_value(CliErrorPayload::from_error(&err)).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"]["kind"], "DocumentNotFound");
        assert_eq!(json["error"]["file"], "gone.py");
        assert!(json["error"].get("hint").is_none());
    }
}
