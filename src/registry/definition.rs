use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Placeholder expanded to the absolute source root in tool templates
pub const SOURCE_ROOT_PLACEHOLDER: &str = "{source_root}";

/// How a category's tool is invoked over its file list
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DispatchMode {
    /// One invocation with the whole file list
    #[default]
    Batch,
    /// One invocation per file (formatters that accept a single path)
    PerFile,
}

/// Command template for a lint tool or its paired auto-fixer
///
/// # Example TOML
/// ```toml
/// [category.tool]
/// program = "{source_root}/node_modules/.bin/eslint"
/// args = ["--cache"]
/// fix_args = ["--fix"]
/// cwd = "{source_root}"
/// ```
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ToolDefinition {
    /// Executable name or path
    pub program: String,

    /// Leading arguments, always passed
    #[serde(default)]
    pub args: Vec<String>,

    /// Mode flags appended after `args` when fix mode is on
    #[serde(default)]
    pub fix_args: Vec<String>,

    /// Mode flags appended after `args` when fix mode is off
    #[serde(default)]
    pub check_args: Vec<String>,

    /// Extra environment for the child process
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Working directory for the child process (inherited when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,

    /// Capture stderr and pass it through the category's noise filter
    /// instead of letting the tool write to the console directly
    #[serde(default)]
    pub capture_stderr: bool,

    /// Exit status meaning "file needs formatting" (e.g. 2 for `gn format`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub needs_format_status: Option<i32>,
}

impl ToolDefinition {
    /// Expand `{source_root}` in every templated field
    pub fn expand(&self, source_root: &Path) -> Self {
        let root = source_root.to_string_lossy();
        let expand = |s: &String| s.replace(SOURCE_ROOT_PLACEHOLDER, &root);

        Self {
            program: expand(&self.program),
            args: self.args.iter().map(expand).collect(),
            fix_args: self.fix_args.iter().map(expand).collect(),
            check_args: self.check_args.iter().map(expand).collect(),
            env: self
                .env
                .iter()
                .map(|(k, v)| (k.clone(), expand(v)))
                .collect(),
            cwd: self.cwd.as_ref().map(expand),
            capture_stderr: self.capture_stderr,
            needs_format_status: self.needs_format_status,
        }
    }

    /// Working directory as a path, if configured
    pub fn working_dir(&self) -> Option<PathBuf> {
        self.cwd.as_ref().map(PathBuf::from)
    }

    /// Mode flags for the requested mode
    pub fn mode_args(&self, fix: bool) -> &[String] {
        if fix {
            &self.fix_args
        } else {
            &self.check_args
        }
    }
}

/// User-defined lint category loaded from TOML configuration
///
/// # Example TOML
/// ```toml
/// [[category]]
/// key = "javascript"
/// aliases = ["js", "es"]
/// description = "JavaScript style (eslint)"
/// roots = ["lib", "spec"]
/// ignore_roots = ["spec/node_modules"]
/// extensions = ["js"]
///
/// [category.tool]
/// program = "eslint"
/// ```
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct CategoryDefinition {
    /// Unique category key (e.g., "c++", "javascript")
    pub key: String,

    /// Alternative names accepted on the command line
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Scan roots, relative to the source root
    pub roots: Vec<String>,

    /// Subtrees excluded from this category, relative to the source root
    #[serde(default)]
    pub ignore_roots: Vec<String>,

    /// File extensions without the leading dot (e.g., ["cc", "h"])
    pub extensions: Vec<String>,

    /// Regular expressions for informational stderr lines that are not findings
    #[serde(default)]
    pub noise: Vec<String>,

    #[serde(default)]
    pub mode: DispatchMode,

    /// The lint tool
    pub tool: ToolDefinition,

    /// Optional auto-fixer run after a failing lint when `--fix` is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixer: Option<ToolDefinition>,
}

impl CategoryDefinition {
    /// All names this category answers to, key first
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.key.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// Command that lists changed files, relative to the source root
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct VcsDefinition {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl VcsDefinition {
    /// Expand `{source_root}` in the program and arguments
    pub fn expand(&self, source_root: &Path) -> Self {
        let root = source_root.to_string_lossy();
        Self {
            program: self.program.replace(SOURCE_ROOT_PLACEHOLDER, &root),
            args: self
                .args
                .iter()
                .map(|a| a.replace(SOURCE_ROOT_PLACEHOLDER, &root))
                .collect(),
        }
    }
}

impl Default for VcsDefinition {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
            args: vec![
                "diff".to_string(),
                "--name-only".to_string(),
                "--cached".to_string(),
            ],
        }
    }
}

/// Top-level layout of a registry file
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct RegistryFile {
    /// Paths never linted, relative to the source root
    #[serde(default)]
    pub blacklist: Vec<String>,

    #[serde(default)]
    pub vcs: VcsDefinition,

    #[serde(default)]
    pub category: Vec<CategoryDefinition>,
}
