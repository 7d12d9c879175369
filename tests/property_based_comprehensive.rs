//! Property-based tests for the path and filter pipeline
//!
//! Core properties:
//! 1. Path normalization is idempotent and never leaves `.` components
//! 2. Filtering is idempotent
//! 3. Blacklisted paths never survive, even when changed
//! 4. An empty whitelist keeps nothing
//! 5. Missing ignore roots never remove anything
//! 6. Every candidate is either kept or removed, never both

use polylint::changed::parse_changed_paths;
use polylint::filter::{filter, Exclusion};
use polylint::paths::{self, PathSet};
use polylint::registry::FilePredicate;
use proptest::prelude::*;
use std::path::{Component, Path, PathBuf};

fn relative_path() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            3 => "[a-z]{1,6}",
            1 => Just(".".to_string()),
            1 => Just("..".to_string()),
        ],
        1..6,
    )
    .prop_map(|parts| parts.join("/"))
}

fn candidate_set() -> impl Strategy<Value = PathSet> {
    prop::collection::btree_set("[a-d]{1,2}/[a-f]{1,3}\\.(cc|h|js)", 0..20)
        .prop_map(|names| names.into_iter().map(|n| PathBuf::from("/src").join(n)).collect())
}

fn subset(set: &PathSet, mask: &[bool]) -> PathSet {
    set.iter()
        .zip(mask.iter().cycle())
        .filter(|(_, &keep)| keep)
        .map(|(p, _)| p.clone())
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_normalize_is_idempotent(rel in relative_path()) {
        let once = paths::resolve(Path::new("/src/electron"), &rel);
        let twice = paths::normalize(&once);
        prop_assert_eq!(&once, &twice);
        prop_assert!(once.is_absolute());
        prop_assert!(once.components().all(|c| !matches!(c, Component::CurDir | Component::ParentDir)));
    }

    #[test]
    fn prop_filter_is_idempotent(
        candidates in candidate_set(),
        black_mask in prop::collection::vec(any::<bool>(), 1..8),
        white_mask in prop::collection::vec(any::<bool>(), 1..8),
    ) {
        let blacklist = subset(&candidates, &black_mask);
        let whitelist = subset(&candidates, &white_mask);

        let once = filter(candidates, &blacklist, &[], |_| true, Some(&whitelist));
        let twice = filter(once.kept.clone(), &blacklist, &[], |_| true, Some(&whitelist));

        prop_assert_eq!(once.kept, twice.kept);
        prop_assert!(twice.removed.is_empty());
    }

    #[test]
    fn prop_blacklist_always_wins(
        candidates in candidate_set(),
        mask in prop::collection::vec(any::<bool>(), 1..8),
    ) {
        let blacklist = subset(&candidates, &mask);
        // Every candidate is "changed"
        let whitelist = candidates.clone();

        let outcome = filter(candidates, &blacklist, &[], |_| true, Some(&whitelist));

        prop_assert!(outcome.kept.is_disjoint(&blacklist));
        prop_assert_eq!(outcome.removed_by(Exclusion::Blacklisted), blacklist.len());
    }

    #[test]
    fn prop_empty_whitelist_keeps_nothing(candidates in candidate_set()) {
        let total = candidates.len();
        let outcome = filter(candidates, &PathSet::new(), &[], |_| true, Some(&PathSet::new()));

        prop_assert!(outcome.kept.is_empty());
        prop_assert_eq!(outcome.removed_by(Exclusion::NotChanged), total);
    }

    #[test]
    fn prop_missing_ignore_root_is_noop(candidates in candidate_set(), name in "[a-z]{8}") {
        let ignore = vec![PathBuf::from("/nonexistent/polylint").join(name)];
        let outcome = filter(candidates.clone(), &PathSet::new(), &ignore, |_| true, None);

        prop_assert_eq!(outcome.kept, candidates);
        prop_assert!(outcome.removed.is_empty());
    }

    #[test]
    fn prop_kept_and_removed_partition_candidates(
        candidates in candidate_set(),
        black_mask in prop::collection::vec(any::<bool>(), 1..8),
        white_mask in prop::collection::vec(any::<bool>(), 1..8),
    ) {
        let blacklist = subset(&candidates, &black_mask);
        let whitelist = subset(&candidates, &white_mask);

        let outcome = filter(candidates.clone(), &blacklist, &[], |_| true, Some(&whitelist));

        prop_assert_eq!(outcome.kept.len() + outcome.removed.len(), candidates.len());
        for path in &outcome.kept {
            prop_assert!(!outcome.removed.contains_key(path));
            prop_assert!(whitelist.contains(path));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_changed_paths_are_absolute(lines in prop::collection::vec("[a-z]{1,5}(/[a-z]{1,5}){0,3}", 0..10)) {
        let stdout = lines.join("\n");
        let changed = parse_changed_paths(&stdout, Path::new("/src"));

        prop_assert!(changed.len() <= lines.len());
        for path in &changed {
            prop_assert!(path.starts_with("/src"));
        }
    }

    #[test]
    fn prop_predicate_accepts_dotted_and_bare_extensions(ext in "[a-z]{1,4}", stem in "[a-z]{1,8}") {
        let bare = FilePredicate::from_extensions([ext.as_str()]);
        let dotted = FilePredicate::from_extensions([format!(".{}", ext)]);
        let file = PathBuf::from(format!("/src/{}.{}", stem, ext));

        prop_assert!(bare.matches(&file));
        prop_assert!(dotted.matches(&file));
        let other = PathBuf::from(format!("/src/{}.{}x", stem, ext));
        prop_assert!(!bare.matches(&other));
    }
}
