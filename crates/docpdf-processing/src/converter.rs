//! External document converter
//!
//! The conversion itself is delegated to an office suite running headless as a
//! subprocess. This module owns launching it, bounding how long we wait, and
//! making sure nothing it spawned outlives a timeout.

use async_trait::async_trait;
use docpdf_core::constants::TARGET_FORMAT;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Why a conversion did not succeed
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("converter exited with status {code:?}: {stderr}")]
    Failed { code: Option<i32>, stderr: String },

    #[error("converter did not finish within {}s", .timeout.as_secs())]
    TimedOut { timeout: Duration },

    #[error("failed to run converter `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Converts a document into the target format inside `output_dir`.
///
/// Success means only that the tool said so; callers still have to check the
/// expected output file exists (see [`ConversionOutcome::resolve`]).
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    async fn convert(&self, input_path: &Path, output_dir: &Path) -> Result<(), ConversionError>;
}

/// What a single conversion attempt produced.
#[derive(Debug)]
pub enum ConversionOutcome {
    /// Tool exited zero and the expected file is present.
    Converted(PathBuf),
    /// Tool exited zero but the expected file is absent.
    OutputMissing(PathBuf),
    /// Tool failed, timed out, or could not be started.
    Failed(ConversionError),
}

impl ConversionOutcome {
    /// Combine the converter's verdict with a check for the expected output.
    pub async fn resolve(result: Result<(), ConversionError>, expected_output: PathBuf) -> Self {
        match result {
            Err(e) => ConversionOutcome::Failed(e),
            Ok(()) => match tokio::fs::try_exists(&expected_output).await {
                Ok(true) => ConversionOutcome::Converted(expected_output),
                Ok(false) | Err(_) => ConversionOutcome::OutputMissing(expected_output),
            },
        }
    }
}

/// LibreOffice (or any tool with the same command line) run headless.
///
/// Invocation: `<program> [leading args] --headless --convert-to pdf --outdir <dir> <input>`.
#[derive(Clone, Debug)]
pub struct LibreOfficeConverter {
    program: String,
    leading_args: Vec<String>,
    timeout: Duration,
}

impl LibreOfficeConverter {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            timeout,
        }
    }

    /// Build from a command line split into words, e.g. `["xvfb-run", "soffice"]`.
    /// Returns `None` for an empty command.
    pub fn from_command(command: &[String], timeout: Duration) -> Option<Self> {
        let (program, leading_args) = command.split_first()?;
        Some(Self::new(program.clone(), timeout).with_leading_args(leading_args.to_vec()))
    }

    /// Arguments placed before the conversion flags.
    pub fn with_leading_args(mut self, args: Vec<String>) -> Self {
        self.leading_args = args;
        self
    }

    fn build_command(&self, input_path: &Path, output_dir: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.leading_args)
            .arg("--headless")
            .arg("--convert-to")
            .arg(TARGET_FORMAT)
            .arg("--outdir")
            .arg(output_dir)
            .arg(input_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Own process group, so a timeout can take down helpers the tool forks.
        #[cfg(unix)]
        command.process_group(0);

        command
    }
}

#[async_trait]
impl DocumentConverter for LibreOfficeConverter {
    async fn convert(&self, input_path: &Path, output_dir: &Path) -> Result<(), ConversionError> {
        tracing::info!(
            program = %self.program,
            args = ?self.leading_args,
            input = %input_path.display(),
            output_dir = %output_dir.display(),
            "Running converter"
        );

        let child = self
            .build_command(input_path, output_dir)
            .spawn()
            .map_err(|source| {
                tracing::error!(program = %self.program, error = %source, "Failed to start converter");
                ConversionError::Launch {
                    program: self.program.clone(),
                    source,
                }
            })?;
        let pid = child.id();

        // Dropping the wait future on timeout also drops the child, which
        // kill_on_drop turns into a SIGKILL for the direct child.
        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) if output.status.success() => {
                tracing::info!("Conversion successful");
                Ok(())
            }
            Ok(Ok(output)) => {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                tracing::error!(
                    code = ?output.status.code(),
                    stderr = %stderr,
                    "Conversion error"
                );
                Err(ConversionError::Failed {
                    code: output.status.code(),
                    stderr,
                })
            }
            Ok(Err(source)) => {
                tracing::error!(error = %source, "Unexpected error during conversion");
                Err(ConversionError::Launch {
                    program: self.program.clone(),
                    source,
                })
            }
            Err(_) => {
                if let Some(pid) = pid {
                    terminate_process_group(pid);
                }
                tracing::error!(
                    timeout_secs = self.timeout.as_secs(),
                    pid = ?pid,
                    "Conversion timeout"
                );
                Err(ConversionError::TimedOut {
                    timeout: self.timeout,
                })
            }
        }
    }
}

/// SIGKILL every process in the group led by `pid`.
#[cfg(unix)]
fn terminate_process_group(pid: u32) {
    let Ok(pgid) = libc::pid_t::try_from(pid) else {
        return;
    };
    // SAFETY: kill(2) has no memory-safety preconditions; a negative pid addresses the group.
    let rc = unsafe { libc::kill(-pgid, libc::SIGKILL) };
    if rc != 0 {
        let err = io::Error::last_os_error();
        if err.raw_os_error() != Some(libc::ESRCH) {
            tracing::warn!(pid, error = %err, "Failed to kill converter process group");
        }
    }
}

#[cfg(not(unix))]
fn terminate_process_group(_pid: u32) {}
