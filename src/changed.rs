//! Changed-file resolution for `--changed` mode
//!
//! Runs the registry's VCS command (by default `git diff --name-only --cached`)
//! in the source root and turns its output into a whitelist of absolute,
//! normalized paths. Any failure is fatal for the run: there is no
//! partial-whitelist fallback.

use crate::paths::{self, PathSet};
use crate::process::{Invocation, ProcessRunner, ToolInvocationError};
use crate::registry::VcsDefinition;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VcsError {
    #[error("Failed to find changed files: could not run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: ToolInvocationError,
    },

    #[error("Failed to find changed files: '{command}' exited with status {code}: {stderr}")]
    Failed {
        command: String,
        code: i32,
        stderr: String,
    },
}

/// Resolves the set of changed files through a [`ProcessRunner`]
pub struct ChangedFileResolver<'a> {
    vcs: &'a VcsDefinition,
    runner: &'a dyn ProcessRunner,
}

impl<'a> ChangedFileResolver<'a> {
    pub fn new(vcs: &'a VcsDefinition, runner: &'a dyn ProcessRunner) -> Self {
        Self { vcs, runner }
    }

    /// List changed files under `repo_root`
    ///
    /// # Errors
    /// Returns [`VcsError`] if the VCS command can't be started or exits
    /// non-zero.
    pub fn resolve(&self, repo_root: &Path) -> Result<PathSet, VcsError> {
        let invocation = Invocation::new(&self.vcs.program)
            .args(&self.vcs.args)
            .current_dir(Some(repo_root.to_path_buf()))
            .capture_stdout(true)
            .capture_stderr(true);

        let output = self
            .runner
            .run(&invocation)
            .map_err(|source| VcsError::Spawn {
                command: invocation.to_string(),
                source,
            })?;

        if !output.success() {
            return Err(VcsError::Failed {
                command: invocation.to_string(),
                code: output.code,
                stderr: output.stderr.trim().to_string(),
            });
        }

        let changed = parse_changed_paths(&output.stdout, repo_root);
        tracing::info!("{} changed files", changed.len());
        Ok(changed)
    }
}

/// Parse newline-separated relative paths into absolute normalized paths
///
/// Accepts `\n`, `\r\n` and `\r` line endings; blank lines are ignored.
/// Other whitespace is part of the file name.
pub fn parse_changed_paths(stdout: &str, repo_root: &Path) -> PathSet {
    stdout
        .split(['\r', '\n'])
        .filter(|line| !line.is_empty())
        .map(|line| paths::resolve(repo_root, line))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{ProcessOutput, RecordingRunner};
    use std::path::PathBuf;

    #[test]
    fn test_parse_mixed_line_endings() {
        let changed = parse_changed_paths("lib/a.js\r\natom/b.cc\rBUILD.gn\n\n", Path::new("/src"));

        let expected: PathSet = ["/src/lib/a.js", "/src/atom/b.cc", "/src/BUILD.gn"]
            .iter()
            .map(PathBuf::from)
            .collect();
        assert_eq!(changed, expected);
    }

    #[test]
    fn test_parse_keeps_trailing_spaces() {
        let changed = parse_changed_paths("lib/a.js \r\n lib/b.js\n", Path::new("/src"));

        assert!(changed.contains(Path::new("/src/lib/a.js ")));
        assert!(changed.contains(Path::new("/src/ lib/b.js")));
        assert!(!changed.contains(Path::new("/src/lib/a.js")));
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_changed_paths("", Path::new("/src")).is_empty());
        assert!(parse_changed_paths("\n", Path::new("/src")).is_empty());
    }

    #[test]
    fn test_resolve_runs_vcs_in_repo_root() {
        let runner = RecordingRunner::new(|_| {
            Ok(ProcessOutput::with_code(0).with_stdout("lib/browser/init.js\n"))
        });
        let vcs = VcsDefinition::default();

        let changed = ChangedFileResolver::new(&vcs, &runner)
            .resolve(Path::new("/src/electron"))
            .unwrap();

        assert!(changed.contains(Path::new("/src/electron/lib/browser/init.js")));

        let calls = runner.invocations();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "git");
        assert_eq!(calls[0].args, vec!["diff", "--name-only", "--cached"]);
        assert_eq!(calls[0].cwd, Some(PathBuf::from("/src/electron")));
        assert!(calls[0].capture_stdout);
    }

    #[test]
    fn test_resolve_nonzero_exit_is_error() {
        let runner = RecordingRunner::new(|_| {
            Ok(ProcessOutput::with_code(128).with_stderr("fatal: not a git repository\n"))
        });
        let vcs = VcsDefinition::default();

        let err = ChangedFileResolver::new(&vcs, &runner)
            .resolve(Path::new("/tmp"))
            .unwrap_err();

        match &err {
            VcsError::Failed { code, stderr, .. } => {
                assert_eq!(*code, 128);
                assert_eq!(stderr, "fatal: not a git repository");
            }
            other => panic!("Expected Failed, got {:?}", other),
        }
        assert!(err.to_string().contains("git diff --name-only --cached"));
    }

    #[test]
    fn test_resolve_spawn_failure_is_error() {
        let runner = RecordingRunner::new(|inv| {
            Err(ToolInvocationError::NotFound {
                program: inv.program.clone(),
            })
        });
        let vcs = VcsDefinition::default();

        let result = ChangedFileResolver::new(&vcs, &runner).resolve(Path::new("/src"));
        assert!(matches!(result, Err(VcsError::Spawn { .. })));
    }
}
