//! Grouping of locations by file.

use crate::location::Location;
use indexmap::IndexMap;
use std::path::PathBuf;

/// All locations that fall into one file.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceGroup {
    /// The shared file.
    pub file: PathBuf,

    /// Locations in input order.
    pub locations: Vec<Location>,
}

impl ReferenceGroup {
    /// Locations sorted ascending by `(start.line, start.column)`.
    pub fn sorted_locations(&self) -> Vec<Location> {
        let mut sorted = self.locations.clone();
        sorted.sort_by_key(Location::start);
        sorted
    }
}

/// Group locations by file.
///
/// Files appear in the order they are first encountered; a file that shows
/// up again later joins its existing group. Within a group the input order
/// is kept, sorting is left to the renderer.
///
/// # Examples
///
/// ```
/// # use xrefs::location::{group_by_file, Location};
/// let locations = vec![
///     Location::on_line("b.py", 3, 0, 1),
///     Location::on_line("a.py", 1, 0, 1),
///     Location::on_line("b.py", 0, 0, 1),
/// ];
/// let groups = group_by_file(&locations);
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].file.to_str(), Some("b.py"));
/// assert_eq!(groups[0].locations.len(), 2);
/// ```
pub fn group_by_file(locations: &[Location]) -> Vec<ReferenceGroup> {
    let mut groups: IndexMap<&PathBuf, Vec<Location>> = IndexMap::new();
    for location in locations {
        groups
            .entry(&location.file)
            .or_default()
            .push(location.clone());
    }

    groups
        .into_iter()
        .map(|(file, locations)| ReferenceGroup {
            file: file.clone(),
            locations,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_empty() {
        assert!(group_by_file(&[]).is_empty());
    }

    #[test]
    fn test_group_keeps_input_order_within_file() {
        let locations = vec![
            Location::on_line("a.py", 9, 0, 1),
            Location::on_line("a.py", 2, 4, 5),
        ];
        let groups = group_by_file(&locations);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].locations, locations);

        let sorted = groups[0].sorted_locations();
        assert_eq!(sorted[0].range.start.line, 2);
        assert_eq!(sorted[1].range.start.line, 9);
    }
}
