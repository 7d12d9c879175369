// Integration test utilities
//
// Builds throwaway source trees with shell-script stand-ins for real linters.
// Every fake tool appends "<name> <args...>" to bin/calls.log so tests can
// check which tools ran and with what arguments.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct FakeTree {
    dir: TempDir,
    root: PathBuf,
}

impl FakeTree {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        // polylint canonicalizes --root, so compare against the same form
        let root = dir.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("bin")).unwrap();
        Self { dir, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create a source file (and its parent directories)
    pub fn file(&self, relative: &str) -> PathBuf {
        let path = self.root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();
        path
    }

    /// Install an executable shell script at bin/<name>
    ///
    /// The script logs its invocation first, then runs `body`.
    pub fn tool(&self, name: &str, body: &str) {
        let path = self.root.join("bin").join(name);
        let script = format!(
            "#!/bin/sh\necho \"{} $*\" >> \"$(dirname \"$0\")/calls.log\"\n{}\n",
            name, body
        );
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// Write the tree-local registry file
    pub fn registry(&self, toml: &str) {
        fs::write(self.root.join(".polylint.toml"), toml).unwrap();
    }

    /// Logged invocations, one line per call
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.root.join("bin").join("calls.log"))
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Logged invocations of one tool
    pub fn calls_of(&self, name: &str) -> Vec<String> {
        let prefix = format!("{} ", name);
        self.calls()
            .into_iter()
            .filter(|line| line.starts_with(&prefix))
            .collect()
    }

    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("polylint");
        cmd.arg("--root").arg(&self.root);
        cmd
    }
}
