//! Xrefs CLI binary
//!
//! This is the main entry point for the xrefs command-line interface.
//! The CLI is a thin adapter over existing APIs - NO logic is implemented here.

use std::path::PathBuf;
use std::process::ExitCode;

use xrefs::cli::{CliErrorPayload, CliSuccessPayload, Commands, KindFilter};
use xrefs::document::FsDocuments;
use xrefs::location::Position;
use xrefs::render::{RenderConfig, XrefOptions};
use xrefs::search::{JsonLocations, LocationSearch, NameSearch};
use xrefs::session::XrefsSession;
use xrefs::XrefsError;

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = xrefs::cli::parse_args();

    // Initialize logger if verbose
    if cli.verbose {
        env_logger::init();
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {}", e);
            return ExitCode::from(1);
        }
    };

    // Execute command
    let result = match cli.command {
        Commands::Find {
            file,
            line,
            column,
            kind,
            glob,
            locations,
            before,
            after,
        } => {
            let request = FindRequest {
                file,
                position: Position::new((line - 1) as usize, column),
                kind,
                glob,
                locations,
                config: RenderConfig {
                    context_before: before,
                    context_after: after,
                },
            };
            runtime.block_on(execute_find(request))
        }
    };

    // Handle result
    match result {
        Ok(report) => {
            if cli.json {
                let payload = CliSuccessPayload::with_data(
                    report.content,
                    serde_json::json!({
                        "files": report.files,
                        "references": report.references,
                    }),
                );
                print_json(&payload);
            } else {
                print!("{}", report.content);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            if cli.json {
                print_json(&CliErrorPayload::from_error(&e));
            } else {
                eprintln!("Error: {}", e);
            }
            ExitCode::from(1)
        }
    }
}

struct FindRequest {
    file: PathBuf,
    position: Position,
    kind: Option<KindFilter>,
    glob: Option<String>,
    locations: Option<PathBuf>,
    config: RenderConfig,
}

struct FindReport {
    content: String,
    files: usize,
    references: usize,
}

/// Execute the find command.
///
/// This function is a thin adapter that:
/// 1. Picks the location search (JSON list or name search)
/// 2. Runs a report session over its results
/// 3. Returns the final report text
///
/// All logic is delegated to existing APIs.
async fn execute_find(request: FindRequest) -> Result<FindReport, XrefsError> {
    let search: Box<dyn LocationSearch> = match (&request.locations, &request.glob) {
        (Some(path), _) => Box::new(JsonLocations::new(path)),
        (None, Some(pattern)) => Box::new(NameSearch::from_glob(pattern)?),
        (None, None) => Box::new(NameSearch::default()),
    };

    let options = XrefOptions {
        only_kind: request.kind.map(KindFilter::to_xref_kind),
    };
    let session = XrefsSession::new(options, request.config);
    let handle = session.handle();
    let documents = FsDocuments::new();

    let references = search.find_references(&request.file, request.position);
    let progress = handle.clone();
    session
        .start(references, &documents, move || {
            log::debug!("{} file blocks rendered", progress.block_count());
        })
        .await?;

    let stats = handle.stats().unwrap_or_default();
    Ok(FindReport {
        content: handle.content(),
        files: stats.files,
        references: stats.refs,
    })
}

fn print_json<T: serde::Serialize>(payload: &T) {
    match serde_json::to_string_pretty(payload) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error: failed to encode JSON: {}", e),
    }
}
