//! Tool dispatch and exit-status interpretation
//!
//! A category's tool runs over its filtered file list either once (batch) or
//! once per file (formatters such as `gn format`). The tool's status decides
//! the category's status; a configured auto-fixer runs afterwards on failure
//! when `--fix` is given, without changing the reported status.

use crate::paths::PathSet;
use crate::process::{Invocation, ProcessOutput, ProcessRunner, ToolInvocationError};
use crate::registry::{Category, DispatchMode, ToolDefinition};
use std::path::{Path, PathBuf};

/// Exit code used for failures that have no tool exit code of their own
pub const GENERIC_FAILURE: i32 = 1;

/// Options that apply to every category in a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Ask tools to fix what they can and run auto-fixers after failures
    pub fix: bool,
    /// Print a line per linted category
    pub verbose: bool,
}

/// Why a category was not linted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No file survived filtering
    NoFiles,
    /// `--changed` mode and nothing changed
    NoChangedFiles,
}

/// What went wrong with a single file in per-file mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileProblem {
    /// The formatter reported that the file needs formatting
    NeedsFormatting,
    /// The formatter exited with an unexpected status
    ExitStatus(i32),
    /// The formatter could not be started
    Invocation(String),
}

/// A category-level failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The tool ran and reported findings
    ToolReported { code: i32 },
    /// The tool could not be started
    Invocation { message: String },
    /// Per-file mode: one or more files failed
    Files { problems: Vec<(PathBuf, FileProblem)> },
}

impl Failure {
    pub fn exit_code(&self) -> i32 {
        match self {
            Failure::ToolReported { code } => *code,
            Failure::Invocation { .. } | Failure::Files { .. } => GENERIC_FAILURE,
        }
    }

    /// Whether the tool actually ran and found something to fix
    fn is_fixable(&self) -> bool {
        match self {
            Failure::ToolReported { .. } => true,
            Failure::Invocation { .. } => false,
            Failure::Files { problems } => problems
                .iter()
                .any(|(_, p)| !matches!(p, FileProblem::Invocation(_))),
        }
    }
}

/// Outcome of dispatching one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryStatus {
    Clean,
    Skipped(SkipReason),
    Failed(Failure),
}

impl CategoryStatus {
    /// 0 for clean or skipped categories, the failure's code otherwise
    pub fn exit_code(&self) -> i32 {
        match self {
            CategoryStatus::Clean | CategoryStatus::Skipped(_) => 0,
            CategoryStatus::Failed(failure) => failure.exit_code(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, CategoryStatus::Failed(_))
    }
}

/// Runs category tools through a [`ProcessRunner`]
pub struct Dispatcher<'a> {
    runner: &'a dyn ProcessRunner,
    options: DispatchOptions,
}

impl<'a> Dispatcher<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, options: DispatchOptions) -> Self {
        Self { runner, options }
    }

    /// Lint `files` with the category's tool
    ///
    /// An empty file list is clean and starts no process.
    pub fn dispatch(&self, category: &Category, files: &PathSet) -> CategoryStatus {
        if files.is_empty() {
            tracing::info!("No {} files to lint", category.key);
            if self.options.verbose {
                eprintln!("no {} files to lint", category.key);
            }
            return CategoryStatus::Skipped(SkipReason::NoFiles);
        }

        if self.options.verbose {
            eprintln!(
                "linting {} {} {}",
                files.len(),
                category.key,
                if files.len() == 1 { "file" } else { "files" }
            );
        }

        let status = match category.mode {
            DispatchMode::Batch => self.run_batch(category, files),
            DispatchMode::PerFile => self.run_per_file(category, files),
        };

        if let CategoryStatus::Failed(failure) = &status {
            if self.options.fix && failure.is_fixable() {
                if let Some(fixer) = &category.fixer {
                    self.run_fixer(category, fixer, files);
                }
            }
        }

        status
    }

    fn run_batch(&self, category: &Category, files: &PathSet) -> CategoryStatus {
        let invocation = self.build_invocation(&category.tool, files.iter());

        match self.runner.run(&invocation) {
            Ok(output) => {
                self.report_stderr(category, &output);
                if output.success() {
                    CategoryStatus::Clean
                } else {
                    tracing::debug!("{} failed with status {}", category.key, output.code);
                    CategoryStatus::Failed(Failure::ToolReported { code: output.code })
                }
            }
            Err(e) => {
                eprintln!("{}: {}", category.key, e);
                CategoryStatus::Failed(Failure::Invocation {
                    message: e.to_string(),
                })
            }
        }
    }

    fn run_per_file(&self, category: &Category, files: &PathSet) -> CategoryStatus {
        let mut problems = Vec::new();

        for file in files {
            let invocation = self.build_invocation(&category.tool, std::iter::once(file));
            let problem = match self.runner.run(&invocation) {
                Ok(output) => {
                    self.report_stderr(category, &output);
                    self.classify_file_status(&category.tool, output.code)
                }
                Err(e) => Some(FileProblem::Invocation(e.to_string())),
            };

            if let Some(problem) = problem {
                self.report_file_problem(&category.tool, file, &problem);
                problems.push((file.clone(), problem));
            }
        }

        if problems.is_empty() {
            CategoryStatus::Clean
        } else {
            CategoryStatus::Failed(Failure::Files { problems })
        }
    }

    /// Distinguish "needs formatting" from other non-zero statuses by exact code
    fn classify_file_status(&self, tool: &ToolDefinition, code: i32) -> Option<FileProblem> {
        match code {
            0 => None,
            c if Some(c) == tool.needs_format_status => Some(FileProblem::NeedsFormatting),
            c => Some(FileProblem::ExitStatus(c)),
        }
    }

    fn report_file_problem(&self, tool: &ToolDefinition, file: &Path, problem: &FileProblem) {
        eprintln!("{}", file_problem_message(tool, file, problem));
    }

    /// Run the auto-fixer once over the same files; its result is only logged
    fn run_fixer(&self, category: &Category, fixer: &ToolDefinition, files: &PathSet) {
        tracing::info!("Running {} fixer over {} files", category.key, files.len());
        let invocation = self.build_invocation(fixer, files.iter());

        match self.runner.run(&invocation) {
            Ok(output) if output.success() => {}
            Ok(output) => {
                tracing::warn!("{} fixer exited with status {}", category.key, output.code)
            }
            Err(e) => report_fixer_error(&category.key, &e),
        }
    }

    /// `[args…, mode flags…, files…]` with the tool's env and cwd
    fn build_invocation<'f, I>(&self, tool: &ToolDefinition, files: I) -> Invocation
    where
        I: Iterator<Item = &'f PathBuf>,
    {
        Invocation::new(&tool.program)
            .args(&tool.args)
            .args(tool.mode_args(self.options.fix))
            .args(files.map(|p| p.as_os_str()))
            .envs(&tool.env)
            .current_dir(tool.working_dir())
            .capture_stderr(tool.capture_stderr)
    }

    /// Pass captured stderr through, minus the category's noise lines
    fn report_stderr(&self, category: &Category, output: &ProcessOutput) {
        for line in category.noise.signal_lines(&output.stderr) {
            eprintln!("{}", line);
        }
    }
}

/// Diagnostic for one failed file in per-file mode
///
/// The "needs formatting" hint is the tool's fix command for that file:
/// program and base args without the check-mode flags.
fn file_problem_message(tool: &ToolDefinition, file: &Path, problem: &FileProblem) -> String {
    match problem {
        FileProblem::NeedsFormatting => {
            let fix = Invocation::new(&tool.program).args(&tool.args).arg(file);
            format!(
                "Format errors in \"{}\". Run '{}' or rerun with --fix to fix them.",
                file.display(),
                fix
            )
        }
        FileProblem::ExitStatus(code) => format!(
            "Error running '{}' on \"{}\": exit code {}",
            tool.program,
            file.display(),
            code
        ),
        FileProblem::Invocation(message) => format!(
            "Error running '{}' on \"{}\": {}",
            tool.program,
            file.display(),
            message
        ),
    }
}

fn report_fixer_error(key: &str, error: &ToolInvocationError) {
    eprintln!("{} fixer: {}", key, error);
}
