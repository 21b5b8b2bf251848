#![forbid(unsafe_code)]

//! Bounded execution of external tools
//!
//! Every collaborator (nbconvert, detect-secrets) runs through `run`, which
//! enforces a deadline. A child still running at the deadline is killed and
//! reported as `ProcessError::TimedOut`. The deadline also covers reading
//! its output, since a backgrounded grandchild can hold the pipes open after
//! the child itself exits.

use crate::error::ProcessError;
use std::io::{ErrorKind, Read};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Captured result of a finished process
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Exit code, or -1 when the process was terminated by a signal
    pub fn code(&self) -> i32 {
        self.status.code().unwrap_or(-1)
    }
}

/// Build a `Command` from a program followed by its leading arguments
///
/// # Errors
///
/// Returns `ProcessError::EmptyCommand` if `parts` is empty.
pub fn command_from(parts: &[String]) -> Result<Command, ProcessError> {
    let (program, args) = parts.split_first().ok_or(ProcessError::EmptyCommand)?;
    let mut command = Command::new(program);
    command.args(args);
    Ok(command)
}

/// Run a command to completion, capturing its output, with a deadline
///
/// # Errors
///
/// - `ProcessError::NotFound` if the program does not exist
/// - `ProcessError::TimedOut` if the deadline passes first
/// - `ProcessError::Io` for any other spawn or wait failure
pub fn run(command: &mut Command, timeout: Duration) -> Result<ProcessOutput, ProcessError> {
    let program = command.get_program().to_string_lossy().into_owned();
    log::debug!("running {:?} (timeout {:?})", command, timeout);

    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => ProcessError::NotFound(program.clone()),
            _ => ProcessError::Io {
                program: program.clone(),
                source: e,
            },
        })?;

    // Drain both pipes concurrently so a chatty child cannot block on a full pipe
    let stdout_reader = child.stdout.take().map(drain_in_background);
    let stderr_reader = child.stderr.take().map(drain_in_background);

    // An unrepresentable deadline means no deadline
    let deadline = Instant::now().checked_add(timeout);
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if expired(deadline) => {
                let _ = child.kill();
                let _ = child.wait();
                log::warn!("{} exceeded its {:?} timeout and was killed", program, timeout);
                return Err(ProcessError::TimedOut { program, timeout });
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                let _ = child.kill();
                return Err(ProcessError::Io { program, source: e });
            }
        }
    };

    let (Some(stdout), Some(stderr)) = (
        collect(stdout_reader, deadline),
        collect(stderr_reader, deadline),
    ) else {
        log::warn!(
            "{} exited but its output stayed open past the {:?} timeout",
            program,
            timeout
        );
        return Err(ProcessError::TimedOut { program, timeout });
    };

    log::debug!("{} exited with {}", program, status);
    Ok(ProcessOutput {
        status,
        stdout,
        stderr,
    })
}

fn expired(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|d| Instant::now() >= d)
}

/// Read `pipe` to the end on its own thread
fn drain_in_background(mut pipe: impl Read + Send + 'static) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
    });
    rx
}

/// Drained pipe contents, or `None` if the pipe is still open at the deadline
fn collect(reader: Option<Receiver<String>>, deadline: Option<Instant>) -> Option<String> {
    let Some(reader) = reader else {
        return Some(String::new());
    };
    let received = match deadline {
        Some(d) => reader.recv_timeout(d.saturating_duration_since(Instant::now())),
        None => reader.recv().map_err(|_| RecvTimeoutError::Disconnected),
    };
    match received {
        Ok(text) => Some(text),
        Err(RecvTimeoutError::Disconnected) => Some(String::new()),
        Err(RecvTimeoutError::Timeout) => None,
    }
}
