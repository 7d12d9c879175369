//! Path sets and lexical path normalization
//!
//! Every path that takes part in a set-membership comparison (candidates,
//! blacklist entries, ignore roots, changed files) goes through
//! [`normalize`] first, so `atom/./x.cc` and `atom/y/../x.cc` compare equal.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

/// Unordered collection of absolute file paths without duplicates.
///
/// Backed by a `BTreeSet` so diagnostics and tool argument lists come out in
/// a stable order; the order carries no meaning.
pub type PathSet = BTreeSet<PathBuf>;

/// Lexically normalize a path: drop `.` components and fold `..` into the
/// preceding component. Does not touch the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Join `relative` onto `root` and normalize the result.
///
/// Absolute `relative` paths replace the root, as with [`Path::join`].
pub fn resolve(root: &Path, relative: impl AsRef<Path>) -> PathBuf {
    normalize(&root.join(relative))
}
