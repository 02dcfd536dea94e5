//! Run a background command while the display is off.
//!
//! `offwatch` polls the X server's DPMS power level once per second and keeps
//! exactly one child process running while the display sleeps: the child is
//! started when the display powers down, stopped (SIGINT, then SIGKILL if it
//! lingers) when the display wakes, and restarted with exponential backoff if
//! it exits on its own while the display stays dark.
//!
//! The supervision core is independent of X11: [`supervisor::Supervisor`] is
//! generic over [`display::PowerSource`], and the real DPMS backend lives in
//! [`display::DpmsMonitor`].

pub mod backoff;
pub mod child;
pub mod display;
pub mod error;
pub mod signals;
pub mod supervisor;
