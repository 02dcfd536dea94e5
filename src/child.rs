//! Subprocess controller.
//!
//! [`ChildSupervisor`] owns the lifecycle of at most one child process: it
//! starts the configured command, stops it gracefully with escalation to
//! SIGKILL, and detects self-initiated exits via non-blocking wait. It has no
//! knowledge of display state; the supervision loop issues the commands.

use std::process::ExitStatus;
use std::time::Duration;

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tokio::process::{Child, Command};
use tracing::{error, info, warn};

use crate::error::ControlError;

/// Escalation timings for [`ChildSupervisor::stop`].
///
/// The defaults match the tool's behavior: a short pause after SIGINT, then
/// up to ten non-blocking wait attempts one second apart before SIGKILL.
/// Tests inject much shorter timings.
#[derive(Debug, Clone, Copy)]
pub struct StopTiming {
    /// Pause between sending SIGINT and the first wait attempt.
    pub initial_pause: Duration,
    /// Spacing between non-blocking wait attempts.
    pub retry_interval: Duration,
    /// Number of wait attempts before escalating to SIGKILL.
    pub retries: u32,
}

impl Default for StopTiming {
    fn default() -> Self {
        Self {
            initial_pause: Duration::from_millis(10),
            retry_interval: Duration::from_secs(1),
            retries: 10,
        }
    }
}

struct RunningChild {
    child: Child,
    pid: i32,
}

/// Owns the at-most-one supervised child process.
///
/// Invariant: `pid()` is `Some` iff a child is currently tracked as running.
pub struct ChildSupervisor {
    command: Vec<String>,
    timing: StopTiming,
    running: Option<RunningChild>,
}

impl ChildSupervisor {
    pub fn new(command: Vec<String>) -> Self {
        Self::with_timing(command, StopTiming::default())
    }

    pub fn with_timing(command: Vec<String>, timing: StopTiming) -> Self {
        Self {
            command,
            timing,
            running: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn pid(&self) -> Option<i32> {
        self.running.as_ref().map(|r| r.pid)
    }

    /// Spawn the configured command. Fails without side effects if a child is
    /// already tracked or if process creation fails.
    pub fn start(&mut self) -> Result<(), ControlError> {
        if let Some(running) = &self.running {
            warn!(
                pid = running.pid,
                "tried to start child while already running"
            );
            return Err(ControlError::AlreadyRunning { pid: running.pid });
        }

        let Some(program) = self.command.first().cloned() else {
            let source = std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command");
            error!(error = %source, "failed to execute command");
            return Err(ControlError::Spawn {
                command: String::new(),
                source,
            });
        };
        let mut cmd = Command::new(&program);
        if self.command.len() > 1 {
            cmd.args(&self.command[1..]);
        }

        // stdio is inherited: the child's own output shares our streams.
        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(source) => {
                error!(command = %program, error = %source, "failed to execute command");
                return Err(ControlError::Spawn {
                    command: program,
                    source,
                });
            }
        };

        let pid = match child.id() {
            Some(p) => p as i32,
            None => {
                let source = std::io::Error::other("spawned child has no pid");
                error!(command = %program, error = %source, "failed to execute command");
                return Err(ControlError::Spawn {
                    command: program,
                    source,
                });
            }
        };

        info!(pid, "child process started");
        self.running = Some(RunningChild { child, pid });
        Ok(())
    }

    /// Non-blocking check for a child that exited on its own. On exit the
    /// status is logged and the child is no longer tracked; no escalation is
    /// needed since the process is already gone.
    pub fn try_reap(&mut self) -> Result<Option<ExitStatus>, ControlError> {
        let Some(running) = self.running.as_mut() else {
            return Ok(None);
        };
        match running.child.try_wait() {
            Ok(Some(status)) => {
                info!(pid = running.pid, %status, "child exited");
                self.running = None;
                Ok(Some(status))
            }
            Ok(None) => Ok(None),
            Err(source) => {
                error!(pid = running.pid, error = %source, "failed to wait for child");
                Err(ControlError::Wait { source })
            }
        }
    }

    /// Stop the tracked child: SIGINT, poll for exit, then SIGKILL with a
    /// blocking wait if it refuses to die. A no-op (logged) when nothing is
    /// running. On a signal or wait syscall failure the child remains tracked
    /// and the error is returned; "still running" itself is not an error.
    pub async fn stop(&mut self) -> Result<(), ControlError> {
        let Some(mut running) = self.running.take() else {
            info!("stop requested, but no child is running");
            return Ok(());
        };
        let pid = running.pid;

        info!(pid, "sending SIGINT to child");
        if let Err(source) = kill(Pid::from_raw(pid), Signal::SIGINT) {
            error!(pid, error = %source, "failed to send SIGINT to child");
            self.running = Some(running);
            return Err(ControlError::Signal { pid, source });
        }

        tokio::time::sleep(self.timing.initial_pause).await;
        for _ in 0..self.timing.retries {
            match running.child.try_wait() {
                Ok(Some(status)) => {
                    info!(pid, %status, "child exited");
                    return Ok(());
                }
                Ok(None) => {}
                Err(source) => {
                    error!(pid, error = %source, "failed to wait for child");
                }
            }
            info!(pid, "waiting for child to exit");
            tokio::time::sleep(self.timing.retry_interval).await;
        }

        info!(pid, "sending SIGKILL to child");
        if let Err(source) = kill(Pid::from_raw(pid), Signal::SIGKILL) {
            error!(pid, error = %source, "failed to send SIGKILL to child");
            self.running = Some(running);
            return Err(ControlError::Signal { pid, source });
        }
        match running.child.wait().await {
            Ok(status) => {
                info!(pid, %status, "child killed");
                Ok(())
            }
            Err(source) => {
                error!(pid, error = %source, "failed to reap killed child");
                self.running = Some(running);
                Err(ControlError::Wait { source })
            }
        }
    }
}
