//! CLI argument parsing for Polylint

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the run report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "polylint")]
#[command(version)]
#[command(
    about = "Run per-language linters over a source tree and aggregate their exit codes",
    long_about = None
)]
pub struct Cli {
    /// Lint C++ files (cpplint)
    #[arg(long = "cc", visible_aliases = ["cpp", "cxx"])]
    pub cc: bool,

    /// Lint JavaScript files (eslint)
    #[arg(long = "js", visible_aliases = ["javascript", "es"])]
    pub js: bool,

    /// Lint Python files (pylint)
    #[arg(long = "py", visible_alias = "python")]
    pub py: bool,

    /// Check GN build files (gn format)
    #[arg(long = "gn")]
    pub gn: bool,

    /// Lint only the named category (repeatable; any key or alias from the registry)
    #[arg(long = "only", value_name = "KEY")]
    pub only: Vec<String>,

    /// Only lint files reported as changed by the VCS
    #[arg(short = 'c', long = "changed")]
    pub changed: bool,

    /// Ask linters to fix what they can
    #[arg(long = "fix")]
    pub fix: bool,

    /// Print per-category progress and a run summary
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Source root to lint
    #[arg(long = "root", value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Category registry file (defaults to <root>/.polylint.toml, then the built-in registry)
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// List the registered categories and exit
    #[arg(long = "list")]
    pub list: bool,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Category names requested on the command line
    ///
    /// Language flags come first in a fixed order, followed by `--only`
    /// entries. An empty result selects every registered category.
    pub fn selected_categories(&self) -> Vec<String> {
        let flags = [
            (self.cc, "c++"),
            (self.js, "javascript"),
            (self.py, "python"),
            (self.gn, "gn"),
        ];

        flags
            .iter()
            .filter(|(enabled, _)| *enabled)
            .map(|(_, key)| key.to_string())
            .chain(self.only.iter().cloned())
            .collect()
    }
}
