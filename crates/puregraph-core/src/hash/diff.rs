//! Change detection over path -> hash snapshots

use std::collections::BTreeMap;

use serde::Serialize;

/// Paths that differ between two hash snapshots, each list sorted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HashDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub modified: Vec<String>,
}

impl HashDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

/// Compare two snapshots taken with [`Graph::element_hashes`](crate::graph::Graph::element_hashes)
///
/// A renamed element shows up as one removal plus one addition.
pub fn diff_hashes(before: &BTreeMap<String, String>, after: &BTreeMap<String, String>) -> HashDiff {
    let mut diff = HashDiff::default();
    for (path, old_hash) in before {
        match after.get(path) {
            None => diff.removed.push(path.clone()),
            Some(new_hash) if new_hash != old_hash => diff.modified.push(path.clone()),
            Some(_) => {}
        }
    }
    diff.added = after
        .keys()
        .filter(|path| !before.contains_key(*path))
        .cloned()
        .collect();
    diff
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(p, h)| (p.to_string(), h.to_string()))
            .collect()
    }

    #[test]
    fn test_diff_classifies_changes() {
        let before = snapshot(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let after = snapshot(&[("a", "1"), ("b", "X"), ("d", "4")]);
        let diff = diff_hashes(&before, &after);
        assert_eq!(diff.added, vec!["d"]);
        assert_eq!(diff.removed, vec!["c"]);
        assert_eq!(diff.modified, vec!["b"]);
    }

    #[test]
    fn test_identical_snapshots() {
        let same = snapshot(&[("a", "1")]);
        assert!(diff_hashes(&same, &same).is_empty());
    }
}
