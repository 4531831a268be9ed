//! Exclusion filtering for cleanup candidates.
//!
//! Exclusions are subtrees: a path is excluded when it equals or descends
//! from an exclusion, by whole-component containment. There is no pattern
//! matching here on purpose — a textual prefix check would wrongly drop
//! sibling directories sharing a name prefix.

use std::path::{Path, PathBuf};

use crate::paths;

/// True iff `path` equals or is a descendant of some exclusion.
pub fn is_excluded(path: &Path, exclusions: &[PathBuf]) -> bool {
    if exclusions.is_empty() {
        return false;
    }
    let resolved = paths::normalize(path);
    exclusions.iter().any(|ex| paths::is_within(ex, &resolved))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exclusions(list: &[&str]) -> Vec<PathBuf> {
        list.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_descendants_and_self_are_excluded() {
        let ex = exclusions(&["/data/keep"]);
        assert!(is_excluded(Path::new("/data/keep"), &ex));
        assert!(is_excluded(Path::new("/data/keep/sub/file.txt"), &ex));
    }

    #[test]
    fn test_sibling_with_shared_prefix_is_not_excluded() {
        let ex = exclusions(&["/data/keep"]);
        assert!(!is_excluded(Path::new("/data/keepsake"), &ex));
        assert!(!is_excluded(Path::new("/data/other"), &ex));
    }

    #[test]
    fn test_ancestor_of_exclusion_is_not_excluded() {
        let ex = exclusions(&["/data/keep/deep"]);
        assert!(!is_excluded(Path::new("/data/keep"), &ex));
    }

    #[test]
    fn test_empty_exclusion_set_matches_nothing() {
        assert!(!is_excluded(Path::new("/anything"), &[]));
    }

    #[test]
    fn test_unnormalized_input_is_resolved_before_matching() {
        let ex = exclusions(&["/data/keep"]);
        assert!(is_excluded(Path::new("/data/other/../keep/file"), &ex));
    }
}
