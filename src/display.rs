//! Display power sampling.
//!
//! The supervisor only consumes a binary awake/asleep signal, taken fresh
//! every tick. [`DpmsMonitor`] provides the real reading from the X server's
//! DPMS extension; tests substitute their own [`PowerSource`].

use tracing::trace;
use x11rb::protocol::dpms::{ConnectionExt as _, DPMSMode};
use x11rb::rust_connection::RustConnection;

use crate::error::DisplayError;

/// Binary reading of the display's power state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    /// DPMS reports the display on.
    Awake,
    /// Standby, suspend, or off.
    Asleep,
}

/// Source of display power readings, sampled once per supervision tick.
pub trait PowerSource {
    fn sample(&mut self) -> Result<PowerState, DisplayError>;
}

/// DPMS-backed power source talking to the X server named by `DISPLAY`.
pub struct DpmsMonitor {
    conn: RustConnection,
}

impl DpmsMonitor {
    pub fn connect() -> Result<Self, DisplayError> {
        let (conn, _screen) = x11rb::connect(None)?;
        Ok(Self { conn })
    }
}

impl PowerSource for DpmsMonitor {
    fn sample(&mut self) -> Result<PowerState, DisplayError> {
        let info = self.conn.dpms_info()?.reply()?;
        trace!(power_level = ?info.power_level, dpms_enabled = info.state, "sampled display power");
        Ok(state_from_level(info.power_level))
    }
}

fn state_from_level(level: DPMSMode) -> PowerState {
    if level == DPMSMode::ON {
        PowerState::Awake
    } else {
        PowerState::Asleep
    }
}
