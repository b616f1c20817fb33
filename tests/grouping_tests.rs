//! Location grouping tests.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use xrefs::location::{group_by_file, Location, ReferenceGroup};

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical() -> Vec<Location> {
        vec![
            Location::on_line("pkg/a.py", 0, 0, 1),
            Location::on_line("pkg/a.py", 4, 6, 7),
            Location::on_line("pkg/b.py", 2, 0, 1),
            Location::on_line("pkg/c.py", 9, 3, 4),
            Location::on_line("pkg/b.py", 1, 2, 3),
            Location::on_line("pkg/a.py", 7, 0, 1),
        ]
    }

    fn partition(groups: &[ReferenceGroup]) -> BTreeMap<PathBuf, BTreeSet<(usize, usize)>> {
        groups
            .iter()
            .map(|g| {
                let starts = g
                    .locations
                    .iter()
                    .map(|l| (l.range.start.line, l.range.start.column))
                    .collect();
                (g.file.clone(), starts)
            })
            .collect()
    }

    #[test]
    fn test_first_seen_file_order() {
        let groups = group_by_file(&canonical());
        let files: Vec<&str> = groups
            .iter()
            .map(|g| g.file.to_str().unwrap())
            .collect();
        assert_eq!(files, vec!["pkg/a.py", "pkg/b.py", "pkg/c.py"]);

        // Non-adjacent occurrences join the existing group in input order.
        let a_lines: Vec<usize> = groups[0]
            .locations
            .iter()
            .map(|l| l.range.start.line)
            .collect();
        assert_eq!(a_lines, vec![0, 4, 7]);
        let b_lines: Vec<usize> = groups[1]
            .locations
            .iter()
            .map(|l| l.range.start.line)
            .collect();
        assert_eq!(b_lines, vec![2, 1]);
    }

    #[test]
    fn test_permutations_partition_identically() {
        let input = canonical();
        let expected = partition(&group_by_file(&input));

        for shift in 0..input.len() {
            let mut rotated = input.clone();
            rotated.rotate_left(shift);
            assert_eq!(partition(&group_by_file(&rotated)), expected);

            rotated.reverse();
            assert_eq!(partition(&group_by_file(&rotated)), expected);
        }
    }

    #[test]
    fn test_group_count_and_total_preserved() {
        let input = canonical();
        let groups = group_by_file(&input);
        assert_eq!(groups.len(), 3);
        let total: usize = groups.iter().map(|g| g.locations.len()).sum();
        assert_eq!(total, input.len());
        assert!(groups
            .iter()
            .all(|g| g.locations.iter().all(|l| l.file == g.file)));
    }
}
