//! Child process backends.
//!
//! The driver itself only sees three things: a channel of output chunks, an
//! [`Input`] handle for answering prompts, and a [`Session`] to reap or kill.
//! This module produces all three from a [`SpawnConfig`], over plain pipes or
//! over a PTY.

use crate::config::{Backend, SpawnConfig, StderrMode};
use crate::pty::PtySession;
use crate::reader::spawn_reader;
use anyhow::{Context, Result};
use std::io::Write;
use std::process::Stdio;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{ChildStdin, Command};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

/// Exit status of a driven child, passed through unmodified.
///
/// The driver never interprets this; whether a non-zero code or a signal is a
/// failure is the caller's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus {
    code: Option<i32>,
    signal: Option<i32>,
}

impl ExitStatus {
    /// True when the child exited normally with code zero.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// The exit code, if the child exited normally.
    pub fn code(&self) -> Option<i32> {
        self.code
    }

    /// The signal that terminated the child, if any (Unix, pipe backend).
    pub fn signal(&self) -> Option<i32> {
        self.signal
    }

    fn from_std(status: std::process::ExitStatus) -> Self {
        #[cfg(unix)]
        let signal = {
            use std::os::unix::process::ExitStatusExt;
            status.signal()
        };
        #[cfg(not(unix))]
        let signal = None;

        Self {
            code: status.code(),
            signal,
        }
    }

    fn from_pty(status: portable_pty::ExitStatus) -> Self {
        Self {
            code: Some(status.exit_code() as i32),
            signal: None,
        }
    }
}

impl std::fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.code, self.signal) {
            (Some(code), _) => write!(f, "exit code {code}"),
            (None, Some(signal)) => write!(f, "signal {signal}"),
            (None, None) => write!(f, "unknown status"),
        }
    }
}

/// The child's stdin, owned by the driver for the duration of the run.
pub(crate) enum Input {
    Pipe(ChildStdin),
    Pty(Box<dyn Write + Send>),
}

impl Input {
    /// Write `text` followed by a newline, so the child receives a complete
    /// line, and flush.
    pub(crate) async fn write_line(&mut self, text: &str) -> Result<()> {
        match self {
            Input::Pipe(stdin) => {
                stdin.write_all(text.as_bytes()).await?;
                stdin.write_all(b"\n").await?;
                stdin.flush().await?;
            }
            Input::Pty(writer) => {
                writer.write_all(text.as_bytes())?;
                writer.write_all(b"\n")?;
                writer.flush()?;
            }
        }
        Ok(())
    }
}

/// Handle on the spawned child itself.
pub(crate) enum Session {
    Pipe(tokio::process::Child),
    Pty(PtySession),
}

impl Session {
    /// Reap the child and return its status unmodified.
    pub(crate) async fn wait(&mut self) -> Result<ExitStatus> {
        match self {
            Session::Pipe(child) => {
                let status = child.wait().await.context("Failed to wait for child")?;
                Ok(ExitStatus::from_std(status))
            }
            // By the time the output stream has ended the child has normally
            // already exited, so the blocking wait is immediate.
            Session::Pty(pty) => Ok(ExitStatus::from_pty(pty.wait()?)),
        }
    }

    /// Terminate the child. Ends the output stream, which ends the drive loop.
    pub(crate) fn kill(&mut self) -> Result<()> {
        match self {
            Session::Pipe(child) => child.start_kill().context("Failed to kill child"),
            Session::Pty(pty) => pty.kill(),
        }
    }
}

/// Spawn the configured child and wire up its streams.
pub(crate) fn spawn(
    config: &SpawnConfig,
) -> Result<(Session, Input, UnboundedReceiver<Vec<u8>>)> {
    match config.backend {
        Backend::Pipe => spawn_piped(config),
        Backend::Pty => spawn_pty(config),
    }
}

fn spawn_piped(config: &SpawnConfig) -> Result<(Session, Input, UnboundedReceiver<Vec<u8>>)> {
    let mut command = Command::new(&config.program);
    command.args(&config.args);
    if let Some(dir) = &config.cwd {
        command.current_dir(dir);
    }
    for (key, value) in &config.env {
        command.env(key, value);
    }
    command.stdin(Stdio::piped());
    command.stdout(Stdio::piped());
    command.stderr(match config.stderr {
        StderrMode::Inherit => Stdio::inherit(),
        StderrMode::Null => Stdio::null(),
    });

    let mut child = command
        .spawn()
        .with_context(|| format!("Failed to spawn command: {}", config.program))?;

    let stdin = child.stdin.take().context("Failed to get child stdin")?;
    let mut stdout = child.stdout.take().context("Failed to get child stdout")?;

    let (tx, rx) = unbounded_channel();
    tokio::spawn(async move {
        let mut buffer = [0u8; 4096];
        loop {
            match stdout.read(&mut buffer).await {
                Ok(0) => break, // EOF
                Ok(n) => {
                    if tx.send(buffer[..n].to_vec()).is_err() {
                        break; // Receiver dropped
                    }
                }
                Err(_) => break,
            }
        }
    });

    Ok((Session::Pipe(child), Input::Pipe(stdin), rx))
}

fn spawn_pty(config: &SpawnConfig) -> Result<(Session, Input, UnboundedReceiver<Vec<u8>>)> {
    let (session, reader, writer) = PtySession::spawn(config)?;
    let rx = spawn_reader(reader);
    Ok((Session::Pty(session), Input::Pty(writer), rx))
}
