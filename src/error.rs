//! Error types for child supervision and the display power query.
//!
//! All child-management errors are handled locally by the supervision loop:
//! they are logged and reflected in the operation's return value, but never
//! terminate the supervisor. Only [`DisplayError`] at startup is fatal.

use thiserror::Error;

/// Errors from the subprocess controller.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ControlError {
    /// `start` was called while a child is already tracked. Caller bug; the
    /// existing child is left untouched.
    #[error("child already running (pid {pid})")]
    AlreadyRunning { pid: i32 },

    /// Process creation failed; no child is tracked afterwards.
    #[error("failed to execute {command:?}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Delivering a signal to the tracked child failed.
    #[error("failed to signal child {pid}: {source}")]
    Signal {
        pid: i32,
        #[source]
        source: nix::errno::Errno,
    },

    /// Reaping the child failed unexpectedly.
    #[error("failed to wait for child: {source}")]
    Wait {
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the display power query.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DisplayError {
    /// Could not connect to the X server at all. Fatal at startup.
    #[error("failed to open display: {0}")]
    Connect(#[from] x11rb::errors::ConnectError),

    /// The established connection failed while sending a request.
    #[error("display connection failed: {0}")]
    Connection(#[from] x11rb::errors::ConnectionError),

    /// The DPMS info request itself was rejected.
    #[error("DPMS query failed: {0}")]
    Reply(#[from] x11rb::errors::ReplyError),
}
