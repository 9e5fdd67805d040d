//! Subprocess runner with a wall-clock timeout.
//!
//! Every external program a tool launches goes through [`SubprocessRunner`]:
//! the executable is looked up on `PATH` first, stdin is closed, both output
//! streams are captured and the child is killed when the timeout elapses.
//! A non-zero exit status is not an error here; callers decide what it means.

use confine_domain::ToolError;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

/// Budget for short interactive commands (python scripts, git)
pub const INTERACTIVE_TIMEOUT: Duration = Duration::from_secs(30);

/// Budget for test runners and linters
pub const CHECK_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum captured size per stream (1 MB)
pub const MAX_OUTPUT_SIZE: usize = 1024 * 1024;

const TRUNCATION_NOTICE: &str = "\n... (output truncated)";

/// What to run and where
#[derive(Debug, Clone)]
pub struct ProcessSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub timeout: Duration,
}

impl ProcessSpec {
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
            timeout: INTERACTIVE_TIMEOUT,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `program arg1 arg2` for display
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of a finished process
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Exit code for display, `-1` when killed by a signal
    pub fn code(&self) -> i32 {
        self.exit_code.unwrap_or(-1)
    }
}

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("'{0}' is not installed or not found in PATH")]
    NotFound(String),

    #[error("{program} timed out after {} seconds", .timeout.as_secs())]
    TimedOut { program: String, timeout: Duration },

    #[error("Failed to run {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<ProcessError> for ToolError {
    fn from(err: ProcessError) -> Self {
        match err {
            ProcessError::NotFound(program) => ToolError::external_tool_missing(program),
            ProcessError::TimedOut { program, timeout } => {
                ToolError::timeout(format!("Execution of {}", program), timeout.as_secs())
            }
            ProcessError::Io { .. } => ToolError::unexpected(err),
        }
    }
}

pub struct SubprocessRunner;

impl SubprocessRunner {
    pub async fn run(spec: &ProcessSpec) -> Result<ProcessOutput, ProcessError> {
        let executable = which::which(&spec.program)
            .map_err(|_| ProcessError::NotFound(spec.program.clone()))?;

        debug!(
            command = %spec.command_line(),
            cwd = %spec.cwd.display(),
            timeout_secs = spec.timeout.as_secs(),
            "Spawning process"
        );

        let start = Instant::now();
        let child = Command::new(&executable)
            .args(&spec.args)
            .current_dir(&spec.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| {
                if source.kind() == std::io::ErrorKind::NotFound {
                    ProcessError::NotFound(spec.program.clone())
                } else {
                    ProcessError::Io {
                        program: spec.program.clone(),
                        source,
                    }
                }
            })?;

        // Dropping the wait future drops the child, and kill_on_drop reaps it.
        let output = match tokio::time::timeout(spec.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|source| ProcessError::Io {
                program: spec.program.clone(),
                source,
            })?,
            Err(_) => {
                warn!(command = %spec.command_line(), "Process timed out, killed");
                return Err(ProcessError::TimedOut {
                    program: spec.program.clone(),
                    timeout: spec.timeout,
                });
            }
        };

        let elapsed = start.elapsed();
        debug!(
            exit_code = ?output.status.code(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Process finished"
        );

        Ok(ProcessOutput {
            exit_code: output.status.code(),
            stdout: decode_capped(&output.stdout),
            stderr: decode_capped(&output.stderr),
            elapsed,
        })
    }
}

/// Lossy UTF-8 decode, truncated on a char boundary
fn decode_capped(bytes: &[u8]) -> String {
    let mut text = String::from_utf8_lossy(bytes).into_owned();
    if text.len() > MAX_OUTPUT_SIZE {
        let mut cut = MAX_OUTPUT_SIZE;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push_str(TRUNCATION_NOTICE);
    }
    text
}
