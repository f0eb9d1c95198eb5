use std::{
    io,
    path::{Path, PathBuf},
    process::{ExitStatus, Stdio},
    time::Duration,
};

use tokio::process::Command;

use super::outcome::*;

#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("Failed to spawn '{} {}': {source}", .interpreter.to_string_lossy(), .program.to_string_lossy())]
    Spawn {
        interpreter: PathBuf,
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{}' exited unsuccessfully ({status})", .program.to_string_lossy())]
    Crashed {
        program: PathBuf,
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },

    #[error("'{}' did not finish within {}ms", .program.to_string_lossy(), .limit.as_millis())]
    TimedOut { program: PathBuf, limit: Duration },
}

impl ExecError {
    /// Errors that say nothing about the submission itself, e.g. a missing interpreter.
    pub fn is_environmental(&self) -> bool {
        matches!(self, ExecError::Spawn { .. })
    }

    pub fn stderr(&self) -> Option<&str> {
        match self {
            ExecError::Crashed { stderr, .. } => Some(stderr),
            _ => None,
        }
    }

    pub fn verdict(&self) -> Verdict {
        match self {
            ExecError::TimedOut { .. } => Verdict::Timeout,
            _ => Verdict::Crash,
        }
    }
}

/// Runs `<interpreter> <program> <input>` and captures its output.
#[derive(Debug, Clone)]
pub struct ProgramRunner {
    interpreter: PathBuf,
    time_limit: Option<Duration>,
}

impl ProgramRunner {
    pub const DEFAULT_INTERPRETER: &str = "python3";

    pub fn new(interpreter: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            time_limit: None,
        }
    }

    pub fn time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }

    pub fn get_interpreter(&self) -> &Path {
        &self.interpreter
    }

    pub fn get_time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    pub async fn run(&self, program: &Path, input: &str) -> Result<ProgramOutput, ExecError> {
        log::debug!(
            "Running: {} {} {:?}",
            self.interpreter.to_string_lossy(),
            program.to_string_lossy(),
            input
        );

        let mut cmd = Command::new(&self.interpreter);
        cmd.arg(program)
            .arg(input)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let start_at = tokio::time::Instant::now();
        let res = match self.time_limit {
            None => cmd.output().await,
            Some(limit) => match tokio::time::timeout(limit, cmd.output()).await {
                Ok(res) => res,
                Err(_) => {
                    return Err(ExecError::TimedOut {
                        program: program.to_owned(),
                        limit,
                    })
                }
            },
        };
        let execution_time = start_at.elapsed();

        let output = res.map_err(|source| ExecError::Spawn {
            interpreter: self.interpreter.clone(),
            program: program.to_owned(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(ExecError::Crashed {
                program: program.to_owned(),
                status: output.status,
                stdout,
                stderr,
            });
        }

        Ok(ProgramOutput {
            stdout,
            stderr,
            execution_time,
        })
    }
}

impl Default for ProgramRunner {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERPRETER)
    }
}
