//! The supervision loop.
//!
//! Each tick, strictly in order: reap a self-exited child, sample display
//! power, then act on the transition. The display waking always stops the
//! child within the same tick; the display going to sleep starts it
//! immediately, and a child that exits on its own while the display stays
//! asleep is restarted with exponential backoff.

use std::time::Duration;

use tracing::{info, warn};

use crate::backoff::RestartBackoff;
use crate::child::ChildSupervisor;
use crate::display::{PowerSource, PowerState};
use crate::signals;

/// Drives the child controller from display power transitions.
///
/// `awake` tracks what the supervisor last observed, distinguishing "display
/// just went to sleep, start immediately" from "already asleep and the child
/// exited, apply backoff".
pub struct Supervisor<P> {
    power: P,
    child: ChildSupervisor,
    backoff: RestartBackoff,
    awake: bool,
}

impl<P: PowerSource> Supervisor<P> {
    pub fn new(power: P, child: ChildSupervisor) -> Self {
        Self {
            power,
            child,
            backoff: RestartBackoff::new(),
            awake: true,
        }
    }

    pub fn child(&self) -> &ChildSupervisor {
        &self.child
    }

    pub fn backoff(&self) -> &RestartBackoff {
        &self.backoff
    }

    /// One supervision tick.
    ///
    /// Errors from the controller are logged where they occur and never
    /// propagate; a failed power sample skips the tick entirely, leaving all
    /// state untouched until the server answers again.
    pub async fn step(&mut self) {
        let _ = self.child.try_reap();

        let state = match self.power.sample() {
            Ok(state) => state,
            Err(err) => {
                warn!(error = %err, "display power query failed, skipping tick");
                return;
            }
        };

        match state {
            PowerState::Awake => {
                self.awake = true;
                self.backoff.reset();
                if self.child.is_running() {
                    info!("display woke up, stopping child");
                    let _ = self.child.stop().await;
                }
            }
            PowerState::Asleep => {
                if !self.child.is_running() {
                    if self.awake {
                        info!("display is asleep, starting child");
                        self.backoff.reset();
                        let _ = self.child.start();
                        self.awake = false;
                    } else if self.backoff.tick() {
                        info!("restarting child");
                        let _ = self.child.start();
                    }
                }
            }
        }
    }

    /// Run ticks at the given period until SIGINT/SIGTERM arrives, then stop
    /// the child (full escalation) before returning.
    pub async fn run(&mut self, tick: Duration) -> std::io::Result<()> {
        let mut ticker = tokio::time::interval(tick);
        let shutdown = signals::wait_for_shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.step().await;
                }
                res = &mut shutdown => {
                    info!("caught termination signal, exiting");
                    if self.child.is_running() {
                        let _ = self.child.stop().await;
                    }
                    return res;
                }
            }
        }
    }
}
