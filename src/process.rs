//! Child process invocation
//!
//! Every external program (linters, fixers, the VCS) is started through
//! [`ProcessRunner`], a narrow interface from (program, args, env, cwd,
//! capture flags) to (exit code, captured streams). [`SystemRunner`] spawns
//! real processes; [`RecordingRunner`] records invocations and answers from a
//! script so orchestration can be tested without any tools installed.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

/// A fully specified child process invocation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Invocation {
    pub program: String,
    /// Passed through unchanged, so non-UTF-8 file paths survive
    pub args: Vec<OsString>,
    /// Defaults for the child: a variable already set in the inherited
    /// environment keeps its inherited value
    pub env: BTreeMap<String, String>,
    pub cwd: Option<PathBuf>,
    /// Capture stdout instead of inheriting it
    pub capture_stdout: bool,
    /// Capture stderr instead of inheriting it
    pub capture_stderr: bool,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Default::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn envs(mut self, env: &BTreeMap<String, String>) -> Self {
        self.env
            .extend(env.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn current_dir(mut self, cwd: Option<PathBuf>) -> Self {
        self.cwd = cwd;
        self
    }

    pub fn capture_stdout(mut self, capture: bool) -> Self {
        self.capture_stdout = capture;
        self
    }

    pub fn capture_stderr(mut self, capture: bool) -> Self {
        self.capture_stderr = capture;
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// What a finished child process reported
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOutput {
    /// Exit code; `128 + signal` for processes killed by a signal
    pub code: i32,
    /// Captured stdout (empty when inherited)
    pub stdout: String,
    /// Captured stderr (empty when inherited)
    pub stderr: String,
}

impl ProcessOutput {
    pub fn with_code(code: i32) -> Self {
        Self {
            code,
            ..Default::default()
        }
    }

    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }

    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }

    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// The child process could not be started
#[derive(Debug, Error)]
pub enum ToolInvocationError {
    #[error("Tool not found: {program}")]
    NotFound { program: String },

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Runs child processes to completion
pub trait ProcessRunner {
    /// Run `invocation` and block until it exits
    ///
    /// # Errors
    /// Returns [`ToolInvocationError`] only when the process could not be
    /// started; a non-zero exit is reported through [`ProcessOutput::code`].
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ToolInvocationError>;
}

/// Spawns real processes with `std::process::Command`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ToolInvocationError> {
        tracing::debug!("Running: {}", invocation);

        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .envs(
                invocation
                    .env
                    .iter()
                    .filter(|(key, _)| std::env::var_os(key).is_none()),
            )
            .stdin(Stdio::inherit())
            .stdout(stdio(invocation.capture_stdout))
            .stderr(stdio(invocation.capture_stderr));
        if let Some(cwd) = &invocation.cwd {
            command.current_dir(cwd);
        }

        let output = command.output().map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ToolInvocationError::NotFound {
                    program: invocation.program.clone(),
                }
            } else {
                ToolInvocationError::Spawn {
                    program: invocation.program.clone(),
                    source,
                }
            }
        })?;

        let code = exit_code(output.status);
        tracing::debug!("{} exited with status {}", invocation.program, code);

        Ok(ProcessOutput {
            code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

fn stdio(capture: bool) -> Stdio {
    if capture {
        Stdio::piped()
    } else {
        Stdio::inherit()
    }
}

/// Map an exit status to a single code: the exit code, or `128 + signal`
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

type Responder = dyn Fn(&Invocation) -> Result<ProcessOutput, ToolInvocationError>;

/// Fake runner that records invocations instead of spawning processes
///
/// # Example
/// ```
/// use polylint::process::{Invocation, ProcessOutput, ProcessRunner, RecordingRunner};
///
/// let runner = RecordingRunner::new(|inv| {
///     Ok(ProcessOutput::with_code(if inv.program == "cpplint.py" { 1 } else { 0 }))
/// });
/// let out = runner.run(&Invocation::new("cpplint.py").arg("a.cc")).unwrap();
/// assert_eq!(out.code, 1);
/// assert_eq!(runner.invocations().len(), 1);
/// ```
pub struct RecordingRunner {
    invocations: RefCell<Vec<Invocation>>,
    responder: Box<Responder>,
}

impl RecordingRunner {
    /// Answer every invocation with `responder`
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&Invocation) -> Result<ProcessOutput, ToolInvocationError> + 'static,
    {
        Self {
            invocations: RefCell::new(Vec::new()),
            responder: Box::new(responder),
        }
    }

    /// Every invocation exits 0 with no output
    pub fn succeeding() -> Self {
        Self::new(|_| Ok(ProcessOutput::with_code(0)))
    }

    /// Answer from a table of program → exit code; unknown programs exit 0
    pub fn with_exit_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = (S, i32)>,
        S: Into<String>,
    {
        let codes: BTreeMap<String, i32> =
            codes.into_iter().map(|(p, c)| (p.into(), c)).collect();
        Self::new(move |inv| {
            Ok(ProcessOutput::with_code(
                codes.get(&inv.program).copied().unwrap_or(0),
            ))
        })
    }

    /// All invocations so far, in order
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }

    /// Invocations of one program, in order
    pub fn invocations_of(&self, program: &str) -> Vec<Invocation> {
        self.invocations
            .borrow()
            .iter()
            .filter(|inv| inv.program == program)
            .cloned()
            .collect()
    }
}

impl fmt::Debug for RecordingRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingRunner")
            .field("invocations", &self.invocations.borrow().len())
            .finish()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ToolInvocationError> {
        self.invocations.borrow_mut().push(invocation.clone());
        (self.responder)(invocation)
    }
}
