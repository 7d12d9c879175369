//! Exclusion/inclusion filtering of candidate files
//!
//! Stages run in a fixed order, and the first stage that removes a path is
//! the one recorded against it:
//! 1. blacklist
//! 2. ignore subtrees (enumerated with the category predicate)
//! 3. changed-file whitelist, when present
//!
//! A path on both the blacklist and the whitelist is removed as blacklisted;
//! changed-files mode cannot override the blacklist.

use crate::paths::PathSet;
use crate::walker;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Why a candidate was removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Exclusion {
    /// Listed on the permanent blacklist
    Blacklisted,
    /// Inside one of the category's ignore subtrees
    IgnoredSubtree,
    /// Not in the changed-file whitelist
    NotChanged,
}

/// Result of filtering a candidate set
///
/// Every candidate is in exactly one of `kept` or `removed`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    pub kept: PathSet,
    pub removed: BTreeMap<PathBuf, Exclusion>,
}

impl FilterOutcome {
    /// Number of paths removed for `reason`
    pub fn removed_by(&self, reason: Exclusion) -> usize {
        self.removed.values().filter(|&&r| r == reason).count()
    }

    /// Removal counts per reason, omitting reasons that removed nothing
    pub fn removal_counts(&self) -> BTreeMap<Exclusion, usize> {
        let mut counts = BTreeMap::new();
        for reason in self.removed.values() {
            *counts.entry(*reason).or_insert(0) += 1;
        }
        counts
    }
}

/// Filter `candidates` through blacklist, ignore subtrees and whitelist
///
/// `ignore_roots` that do not exist are skipped. Each existing ignore root is
/// enumerated with `predicate` (the category's own predicate); a category
/// without ignore roots never touches the filesystem here.
///
/// All inputs must already be normalized absolute paths.
pub fn filter<P>(
    candidates: PathSet,
    blacklist: &PathSet,
    ignore_roots: &[PathBuf],
    predicate: P,
    whitelist: Option<&PathSet>,
) -> FilterOutcome
where
    P: Fn(&Path) -> bool,
{
    let mut kept = PathSet::new();
    let mut removed = BTreeMap::new();

    for path in candidates {
        if blacklist.contains(&path) {
            removed.insert(path, Exclusion::Blacklisted);
        } else {
            kept.insert(path);
        }
    }

    for root in ignore_roots {
        if !root.exists() {
            continue;
        }
        for path in walker::enumerate(root, &predicate) {
            if kept.remove(&path) {
                removed.insert(path, Exclusion::IgnoredSubtree);
            }
        }
    }

    if let Some(whitelist) = whitelist {
        let (changed, unchanged): (PathSet, PathSet) =
            kept.into_iter().partition(|p| whitelist.contains(p));
        kept = changed;
        removed.extend(unchanged.into_iter().map(|p| (p, Exclusion::NotChanged)));
    }

    FilterOutcome { kept, removed }
}
