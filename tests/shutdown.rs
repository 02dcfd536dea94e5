//! Termination behavior. Lives in its own test binary because it sends a
//! real SIGTERM to the whole process.

use std::time::Duration;

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;

use offwatch::child::{ChildSupervisor, StopTiming};
use offwatch::display::{PowerSource, PowerState};
use offwatch::error::DisplayError;
use offwatch::supervisor::Supervisor;

struct AlwaysAsleep;

impl PowerSource for AlwaysAsleep {
    fn sample(&mut self) -> Result<PowerState, DisplayError> {
        Ok(PowerState::Asleep)
    }
}

#[tokio::test]
async fn termination_signal_stops_child_before_run_returns() {
    let timing = StopTiming {
        initial_pause: Duration::from_millis(10),
        retry_interval: Duration::from_millis(50),
        retries: 5,
    };
    let child = ChildSupervisor::with_timing(vec!["/bin/sleep".into(), "30".into()], timing);
    let mut sup = Supervisor::new(AlwaysAsleep, child);

    tokio::spawn(async {
        // let the first tick start the child, then interrupt the process
        tokio::time::sleep(Duration::from_millis(300)).await;
        kill(Pid::this(), Signal::SIGTERM).expect("send SIGTERM to self");
    });

    let res = tokio::time::timeout(
        Duration::from_secs(5),
        sup.run(Duration::from_millis(50)),
    )
    .await
    .expect("run should return after the signal");

    assert!(res.is_ok());
    assert!(
        !sup.child().is_running(),
        "child must be stopped before run returns"
    );
}
