//! External tool process management
//!
//! Two ways of running ffprobe / ffmpeg to completion:
//!
//! - [`run_capturing_stdout`]: probe style. stdout is captured into a byte
//!   buffer, stderr goes to `/dev/null`.
//! - [`FfmpegProcess`]: transcode style. stdout is discarded and stderr is
//!   drained on a separate thread so the child can never block on a full
//!   pipe. The drained text is only logged.
//!
//! In both cases success is decided by the exit status alone.
//!
//! ```ignore
//! use shared_utils::ffmpeg_process::FfmpegProcess;
//! use std::process::Command;
//!
//! let mut cmd = Command::new("ffmpeg");
//! cmd.arg("-i").arg("input.mp4").arg("output.mp4");
//!
//! FfmpegProcess::spawn(&mut cmd)?.wait_checked()?;
//! ```

use std::ffi::OsStr;
use std::io::{self, BufRead, BufReader};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

use crate::logging::log_external_tool;

/// Failure to run an external tool to a successful exit.
#[derive(Error, Debug)]
pub enum ToolRunError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {}", describe_exit(.code))]
    Failed { program: String, code: Option<i32> },
}

impl ToolRunError {
    /// Exit code of a child that ran but failed. `None` for spawn errors and
    /// for children killed by a signal.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ToolRunError::Failed { code, .. } => *code,
            _ => None,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Renders a command as a single shell-like line for logging.
pub fn command_line(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(OsStr::to_string_lossy)
        .collect::<Vec<_>>()
        .join(" ")
}

fn program_name(cmd: &Command) -> String {
    cmd.get_program().to_string_lossy().into_owned()
}

/// Runs `cmd` to completion and returns everything it wrote to stdout.
///
/// stderr is discarded and stdin is closed. A child that cannot be started
/// and a child that exits unsuccessfully are both errors; the captured
/// stdout of a failed child is dropped.
pub fn run_capturing_stdout(cmd: &mut Command) -> Result<Vec<u8>, ToolRunError> {
    let program = program_name(cmd);
    let command_str = command_line(cmd);
    info!(command = %command_str, "Executing external command");

    let start = Instant::now();
    let output = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .map_err(|source| ToolRunError::Spawn {
            program: program.clone(),
            source,
        })?;

    log_external_tool(
        &program,
        &command_str,
        &format!("{} bytes on stdout", output.stdout.len()),
        output.status.code(),
        start.elapsed(),
    );

    if !output.status.success() {
        return Err(ToolRunError::Failed {
            program,
            code: output.status.code(),
        });
    }

    Ok(output.stdout)
}

// ═══════════════════════════════════════════════════════════════
// FfmpegProcess - stderr-draining wrapper
// ═══════════════════════════════════════════════════════════════

/// A running ffmpeg child whose stderr is consumed by a background thread.
///
/// ffmpeg writes its banner and per-frame statistics to stderr. Nobody reads
/// that pipe during a plain remux, so it is drained concurrently; otherwise a
/// long run fills the OS pipe buffer and the child stalls forever.
pub struct FfmpegProcess {
    child: Child,
    program: String,
    command: String,
    started: Instant,
    stderr_thread: Option<JoinHandle<String>>,
}

impl FfmpegProcess {
    /// Starts `cmd` with stdin closed, stdout discarded and stderr piped to
    /// a draining thread.
    pub fn spawn(cmd: &mut Command) -> Result<Self, ToolRunError> {
        let program = program_name(cmd);
        let command = command_line(cmd);
        info!(command = %command, "Executing FFmpeg command");

        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|source| ToolRunError::Spawn {
            program: program.clone(),
            source,
        })?;

        let stderr_thread = child.stderr.take().map(|stderr| {
            thread::spawn(move || {
                let mut buf = String::new();
                for line in BufReader::new(stderr).lines().map_while(Result::ok) {
                    buf.push_str(&line);
                    buf.push('\n');
                }
                buf
            })
        });

        Ok(Self {
            child,
            program,
            command,
            started: Instant::now(),
            stderr_thread,
        })
    }

    /// Waits for the child and returns its exit status together with the
    /// collected stderr text.
    pub fn wait_with_output(mut self) -> Result<(ExitStatus, String), ToolRunError> {
        let status = self.child.wait().map_err(|source| ToolRunError::Wait {
            program: self.program.clone(),
            source,
        })?;
        let stderr = self
            .stderr_thread
            .take()
            .and_then(|t| t.join().ok())
            .unwrap_or_default();

        let summary = if status.success() {
            stderr.clone()
        } else {
            format_ffmpeg_error(&stderr)
        };
        log_external_tool(
            &self.program,
            &self.command,
            &summary,
            status.code(),
            self.started.elapsed(),
        );

        Ok((status, stderr))
    }

    /// Waits for the child and turns an unsuccessful exit into
    /// [`ToolRunError::Failed`].
    pub fn wait_checked(self) -> Result<(), ToolRunError> {
        let program = self.program.clone();
        let (status, stderr) = self.wait_with_output()?;
        if !status.success() {
            return Err(ToolRunError::Failed {
                program,
                code: status.code(),
            });
        }
        debug!(stderr_bytes = stderr.len(), "FFmpeg stderr drained");
        Ok(())
    }
}

/// Extracts the most useful line from ffmpeg stderr for a one-line log.
///
/// Prefers the last line mentioning an error, then the last non-progress
/// line, then a fixed fallback.
pub fn format_ffmpeg_error(stderr: &str) -> String {
    if let Some(error_line) = stderr
        .lines()
        .rev()
        .find(|line| line.contains("Error") || line.contains("error"))
    {
        return error_line.trim().to_string();
    }

    stderr
        .lines()
        .rev()
        .find(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty()
                && !trimmed.starts_with("frame=")
                && !trimmed.starts_with("size=")
        })
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "Unknown FFmpeg error".to_string())
}
