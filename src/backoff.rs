//! Restart throttling for a child that keeps exiting while the display
//! stays asleep.
//!
//! The interval starts at 10 seconds and doubles each time it is hit, capped
//! at 300 seconds: 10, 20, 40, 80, 160, 300, 300, … It resets to the floor on
//! every display wake, so a fresh sleep transition always starts the child
//! immediately.

/// Initial (and post-wake) restart interval in seconds.
pub const FLOOR_SECS: u32 = 10;

/// Upper bound on the restart interval in seconds.
pub const CAP_SECS: u32 = 300;

/// Tick-counted exponential backoff state.
///
/// [`tick`](RestartBackoff::tick) is meant to be called once per supervision
/// tick (nominally one second) while the display is asleep and no child is
/// running, so elapsed ticks approximate elapsed seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartBackoff {
    interval: u32,
    elapsed: u32,
}

impl Default for RestartBackoff {
    fn default() -> Self {
        Self::new()
    }
}

impl RestartBackoff {
    pub fn new() -> Self {
        Self {
            interval: FLOOR_SECS,
            elapsed: 0,
        }
    }

    /// Current interval in seconds until the next allowed restart.
    pub fn interval_secs(&self) -> u32 {
        self.interval
    }

    /// Back to the floor. Called on every tick where the display is awake.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Advance one tick. Returns `true` when a restart is due, in which case
    /// the elapsed counter resets and the interval doubles (capped).
    pub fn tick(&mut self) -> bool {
        self.elapsed += 1;
        if self.elapsed >= self.interval {
            self.elapsed = 0;
            self.interval = (self.interval * 2).min(CAP_SECS);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ticks until `tick` reports a due restart.
    fn ticks_until_due(backoff: &mut RestartBackoff) -> u32 {
        let mut n = 0;
        loop {
            n += 1;
            if backoff.tick() {
                return n;
            }
            assert!(n < 1000, "backoff never became due");
        }
    }

    #[test]
    fn interval_sequence_doubles_and_caps() {
        let mut backoff = RestartBackoff::new();
        let mut observed = Vec::new();
        for _ in 0..8 {
            observed.push(ticks_until_due(&mut backoff));
        }
        assert_eq!(observed, vec![10, 20, 40, 80, 160, 300, 300, 300]);
    }

    #[test]
    fn interval_never_exceeds_cap() {
        let mut backoff = RestartBackoff::new();
        for _ in 0..10_000 {
            backoff.tick();
            assert!(backoff.interval_secs() <= CAP_SECS);
        }
    }

    #[test]
    fn not_due_before_interval() {
        let mut backoff = RestartBackoff::new();
        for _ in 0..FLOOR_SECS - 1 {
            assert!(!backoff.tick());
        }
        assert!(backoff.tick());
        assert_eq!(backoff.interval_secs(), 20);
    }

    #[test]
    fn reset_returns_to_floor() {
        let mut backoff = RestartBackoff::new();
        for _ in 0..25 {
            backoff.tick();
        }
        assert!(backoff.interval_secs() > FLOOR_SECS);
        backoff.reset();
        assert_eq!(backoff.interval_secs(), FLOOR_SECS);
        assert_eq!(ticks_until_due(&mut backoff), FLOOR_SECS);
    }
}
