use crate::noise::NoiseFilter;
use crate::paths::{self, PathSet};
use crate::registry::{
    CategoryDefinition, ConfigError, DispatchMode, FilePredicate, RegistryFile, ToolDefinition,
    VcsDefinition,
};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Registry file looked up in the source root when `--config` is not given
pub const LOCAL_REGISTRY_FILE: &str = ".polylint.toml";

/// A lint category resolved against a source root
///
/// Built once at start-up and never mutated. All paths are absolute and
/// normalized; tool templates have `{source_root}` expanded.
#[derive(Debug, Clone)]
pub struct Category {
    pub key: String,
    pub aliases: Vec<String>,
    pub description: String,
    pub roots: Vec<PathBuf>,
    pub ignore_roots: Vec<PathBuf>,
    pub predicate: FilePredicate,
    pub noise: NoiseFilter,
    pub mode: DispatchMode,
    pub tool: ToolDefinition,
    pub fixer: Option<ToolDefinition>,
}

impl Category {
    fn resolve(definition: CategoryDefinition, source_root: &Path) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidCategory {
            category: definition.key.clone(),
            reason: reason.to_string(),
        };

        if definition.key.trim().is_empty() {
            return Err(invalid("key must not be empty"));
        }
        if definition.roots.is_empty() {
            return Err(invalid("at least one scan root is required"));
        }
        if definition.extensions.iter().all(|e| e.trim_start_matches('.').is_empty()) {
            return Err(invalid("at least one non-empty extension is required"));
        }
        if definition.tool.program.trim().is_empty() {
            return Err(invalid("tool program must not be empty"));
        }

        let noise = NoiseFilter::from_patterns(&definition.noise).map_err(|source| {
            // Report the first pattern that fails to compile on its own
            let pattern = definition
                .noise
                .iter()
                .find(|p| regex::Regex::new(p).is_err())
                .cloned()
                .unwrap_or_default();
            ConfigError::NoisePattern {
                category: definition.key.clone(),
                pattern,
                source,
            }
        })?;

        let predicate = FilePredicate::from_extensions(
            definition
                .extensions
                .iter()
                .filter(|e| !e.trim_start_matches('.').is_empty()),
        );

        Ok(Self {
            roots: definition
                .roots
                .iter()
                .map(|r| paths::resolve(source_root, r))
                .collect(),
            ignore_roots: definition
                .ignore_roots
                .iter()
                .map(|r| paths::resolve(source_root, r))
                .collect(),
            predicate,
            noise,
            mode: definition.mode,
            tool: definition.tool.expand(source_root),
            fixer: definition.fixer.as_ref().map(|f| f.expand(source_root)),
            key: definition.key,
            aliases: definition.aliases,
            description: definition.description,
        })
    }

    /// Check if a file belongs to this category
    pub fn matches(&self, path: &Path) -> bool {
        self.predicate.matches(path)
    }

    /// All names this category answers to, key first
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.key.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// Registry of lint categories, the blacklist and the VCS command
///
/// # Example Usage
/// ```no_run
/// use polylint::registry::CategoryRegistry;
/// use std::path::Path;
///
/// let registry = CategoryRegistry::default_categories(Path::new("/src/electron"))?;
/// for category in registry.categories() {
///     println!("{}: {:?}", category.key, category.roots);
/// }
/// # Ok::<(), polylint::registry::ConfigError>(())
/// ```
#[derive(Debug)]
pub struct CategoryRegistry {
    source_root: PathBuf,

    /// Categories in registration order
    categories: Vec<Category>,

    /// Fast lookup: key or alias → index into `categories`
    names: HashMap<String, usize>,

    blacklist: PathSet,

    vcs: VcsDefinition,
}

impl CategoryRegistry {
    /// Load a registry from a TOML file
    ///
    /// # Errors
    /// Returns error if the file can't be read, has invalid TOML syntax, or
    /// defines an invalid category or a duplicate name.
    pub fn from_toml<P: AsRef<Path>>(path: P, source_root: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, source_root)
    }

    /// Parse a registry from TOML text
    pub fn from_toml_str(content: &str, source_root: &Path) -> Result<Self, ConfigError> {
        let file: RegistryFile = toml::from_str(content)?;
        Self::from_file(file, source_root)
    }

    /// Load the default registry embedded in the binary
    pub fn default_categories(source_root: &Path) -> Result<Self, ConfigError> {
        const DEFAULT_TOML: &str = include_str!("../../categories-default.toml");
        Self::from_toml_str(DEFAULT_TOML, source_root)
    }

    /// Pick the registry for a run
    ///
    /// An explicit path wins; otherwise `.polylint.toml` in the source root is
    /// used if present, and the embedded default if not.
    pub fn discover(source_root: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            tracing::debug!("Loading registry from {}", path.display());
            return Self::from_toml(path, source_root);
        }

        let local = source_root.join(LOCAL_REGISTRY_FILE);
        if local.is_file() {
            tracing::debug!("Loading registry from {}", local.display());
            return Self::from_toml(local, source_root);
        }

        tracing::debug!("Using embedded default registry");
        Self::default_categories(source_root)
    }

    /// Resolve a parsed registry file against the source root
    pub fn from_file(file: RegistryFile, source_root: &Path) -> Result<Self, ConfigError> {
        let source_root = paths::normalize(source_root);

        let mut categories = Vec::with_capacity(file.category.len());
        let mut names: HashMap<String, usize> = HashMap::new();

        for definition in file.category {
            let index = categories.len();
            for name in definition.names() {
                if let Some(existing) = names.insert(name.to_string(), index) {
                    // `existing == index` when a category repeats its own name
                    let first = categories
                        .get(existing)
                        .map_or_else(|| definition.key.clone(), |c: &Category| c.key.clone());
                    return Err(ConfigError::DuplicateName {
                        name: name.to_string(),
                        first,
                        second: definition.key.clone(),
                    });
                }
            }
            categories.push(Category::resolve(definition, &source_root)?);
        }

        let blacklist = file
            .blacklist
            .iter()
            .map(|p| paths::resolve(&source_root, p))
            .collect();

        let vcs = file.vcs.expand(&source_root);

        Ok(Self {
            source_root,
            categories,
            names,
            blacklist,
            vcs,
        })
    }

    /// Get a category by key or alias
    pub fn get(&self, name: &str) -> Option<&Category> {
        self.names.get(name).and_then(|&i| self.categories.get(i))
    }

    /// All categories in registration order
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Select the categories to run
    ///
    /// Semantics:
    /// - No names: every category
    /// - Names (keys or aliases): only those, in registration order, each once
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownCategory`] for a name nothing answers to.
    pub fn select<S: AsRef<str>>(&self, requested: &[S]) -> Result<Vec<&Category>, ConfigError> {
        if requested.is_empty() {
            return Ok(self.categories.iter().collect());
        }

        let mut wanted = vec![false; self.categories.len()];
        for name in requested {
            let name = name.as_ref();
            let index = self
                .names
                .get(name)
                .ok_or_else(|| ConfigError::UnknownCategory(name.to_string()))?;
            wanted[*index] = true;
        }

        Ok(self
            .categories
            .iter()
            .zip(wanted)
            .filter_map(|(category, wanted)| wanted.then_some(category))
            .collect())
    }

    /// Absolute paths excluded from every category
    pub fn blacklist(&self) -> &PathSet {
        &self.blacklist
    }

    pub fn vcs(&self) -> &VcsDefinition {
        &self.vcs
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }
}
