//! Location search providers.
//!
//! A [`LocationSearch`] turns a position in a file into every location that
//! refers to the same thing. Real deployments plug in a language server;
//! two simple providers ship here:
//!
//! - [`NameSearch`]: every identifier with the same text in a set of Python
//!   files. Purely syntactic, so unrelated names that happen to match are
//!   included.
//! - [`JsonLocations`]: a pre-computed location list read from a JSON file.

use crate::error::{Result, XrefsError};
use crate::location::{Location, Position, Range};
use crate::syntax::{identifiers, node_at, parse_python, IDENTIFIER};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Finds all references to the symbol at a position.
#[async_trait]
pub trait LocationSearch: Send + Sync {
    /// Locations referring to the symbol at `position` in `file`.
    async fn find_references(&self, file: &Path, position: Position) -> Result<Vec<Location>>;
}

/// Same-name identifier search over a fixed set of Python files.
#[derive(Debug, Clone, Default)]
pub struct NameSearch {
    files: Vec<PathBuf>,
}

impl NameSearch {
    /// Search the given files.
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    /// Search every file matching a glob pattern, in path order.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use xrefs::search::NameSearch;
    /// let search = NameSearch::from_glob("src/**/*.py")?;
    /// # Ok::<(), xrefs::XrefsError>(())
    /// ```
    pub fn from_glob(pattern: &str) -> Result<Self> {
        let paths = glob::glob(pattern)
            .map_err(|e| XrefsError::Other(format!("Invalid glob pattern '{}': {}", pattern, e)))?;

        let mut files = Vec::new();
        for entry in paths {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) => log::warn!("Skipping unreadable path: {}", e),
            }
        }
        Ok(Self { files })
    }

    /// Files searched besides the origin file.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

#[async_trait]
impl LocationSearch for NameSearch {
    async fn find_references(&self, file: &Path, position: Position) -> Result<Vec<Location>> {
        let source = read_source(file).await?;
        let name = name_at(file, &source, position)?;
        log::debug!("Searching for '{}' in {} files", name, self.files.len() + 1);

        let mut found = occurrences(file, &source, &name)?;
        for path in self.files.iter().filter(|p| p.as_path() != file) {
            let text = read_source(path).await?;
            found.extend(occurrences(path, &text, &name)?);
        }
        Ok(found)
    }
}

async fn read_source(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| XrefsError::io(path, e))
}

/// Text of the identifier at `position`.
fn name_at(file: &Path, source: &str, position: Position) -> Result<String> {
    let tree = parse_python(file, source)?;
    let node = node_at(&tree, position)
        .filter(|n| n.kind() == IDENTIFIER)
        .ok_or_else(|| XrefsError::NodeResolution {
            file: file.to_path_buf(),
            line: position.line,
            column: position.column,
        })?;
    Ok(node.utf8_text(source.as_bytes())?.to_string())
}

/// Every identifier in `source` spelled `name`.
fn occurrences(file: &Path, source: &str, name: &str) -> Result<Vec<Location>> {
    let tree = parse_python(file, source)?;
    let mut found = Vec::new();
    for node in identifiers(&tree) {
        if node.utf8_text(source.as_bytes())? != name {
            continue;
        }
        let start = node.start_position();
        let end = node.end_position();
        found.push(Location {
            file: file.to_path_buf(),
            range: Range {
                start: Position::new(start.row, start.column),
                end: Position::new(end.row, end.column),
            },
        });
    }
    Ok(found)
}

/// Locations loaded from a JSON array.
#[derive(Debug, Clone)]
pub struct JsonLocations {
    path: PathBuf,
}

impl JsonLocations {
    /// Read locations from `path` when searched.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl LocationSearch for JsonLocations {
    async fn find_references(&self, _file: &Path, _position: Position) -> Result<Vec<Location>> {
        let text = read_source(&self.path).await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occurrences_match_whole_identifiers() {
        let source = "ab = 1\na = ab\nprint(a.ab)\n";
        let found = occurrences(Path::new("m.py"), source, "ab").unwrap();
        let starts: Vec<(usize, usize)> = found
            .iter()
            .map(|l| (l.range.start.line, l.range.start.column))
            .collect();
        assert_eq!(starts, vec![(0, 0), (1, 4), (2, 8)]);
        assert_eq!(found[0].range.end.column, 2);
    }

    #[test]
    fn test_name_at_requires_identifier() {
        let source = "a = 1\n";
        assert_eq!(name_at(Path::new("m.py"), source, Position::new(0, 0)).unwrap(), "a");
        let err = name_at(Path::new("m.py"), source, Position::new(0, 2)).unwrap_err();
        assert_eq!(err.kind(), "NodeResolutionFailure");
    }
}
