use std::path::Path;

/// Filename predicate: the path ends with one of a set of extensions
///
/// Matching is on the file name suffix, so multi-part extensions such as
/// `d.ts` work and `BUILD.gn` matches `gn`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePredicate {
    suffixes: Vec<String>,
}

impl FilePredicate {
    /// Build a predicate from extensions given with or without the leading dot
    pub fn from_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let suffixes = extensions
            .into_iter()
            .map(|ext| format!(".{}", ext.as_ref().trim_start_matches('.')))
            .collect();
        Self { suffixes }
    }

    pub fn matches(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        self.suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
    }

    /// Extensions without the leading dot
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.suffixes.iter().map(|s| &s[1..])
    }
}
