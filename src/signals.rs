//! Shutdown signal handling.
//!
//! [`wait_for_shutdown_signal`] completes when the process receives SIGINT
//! (Ctrl-C) or SIGTERM. The supervision loop selects on it and performs the
//! child stop sequence in normal execution context, never inside a signal
//! handler.

#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = sigint.recv() => {},
        _ = sigterm.recv() => {},
    }
    Ok(())
}

#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
