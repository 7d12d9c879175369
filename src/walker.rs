//! Recursive file enumeration
//!
//! Used for both scan roots and ignore roots. A root that does not exist
//! yields nothing: ignore roots are routinely absent (e.g. `spec/node_modules`
//! before `npm install`) and must be skipped silently.

use crate::paths::{self, PathSet};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lazily yield every regular file below `root` for which `predicate` holds.
///
/// Paths are absolute if `root` is, and always lexically normalized.
/// Symbolic links are not followed, so link cycles cannot cause loops.
/// Unreadable entries are logged and skipped.
pub fn enumerate<'a, P>(root: &Path, predicate: P) -> impl Iterator<Item = PathBuf> + 'a
where
    P: Fn(&Path) -> bool + 'a,
{
    let walker = if root.exists() {
        Some(WalkDir::new(root).follow_links(false))
    } else {
        tracing::debug!("Skipping missing root {}", root.display());
        None
    };

    walker
        .into_iter()
        .flatten()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| paths::normalize(entry.path()))
        .filter(move |path| predicate(path.as_path()))
}

/// Enumerate several roots and collect the union into a [`PathSet`].
///
/// Overlapping roots (e.g. `script` and `.`) cannot double-count a file.
pub fn collect<P>(roots: &[PathBuf], predicate: P) -> PathSet
where
    P: Fn(&Path) -> bool + Copy,
{
    roots
        .iter()
        .flat_map(|root| enumerate(root, predicate))
        .collect()
}
