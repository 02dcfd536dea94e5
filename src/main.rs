use std::process;
use std::time::Duration;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use offwatch::child::ChildSupervisor;
use offwatch::display::DpmsMonitor;
use offwatch::supervisor::Supervisor;

const EXIT_OK: i32 = 0;
const EXIT_FATAL: i32 = 1;

/// Run a background command while the display is off.
///
/// The command is started when DPMS puts the display to sleep, stopped when
/// it wakes, and restarted with exponential backoff if it exits on its own
/// while the display stays dark.
#[derive(Parser, Debug)]
#[command(name = "offwatch", version)]
struct Cli {
    /// Seconds between display power polls.
    #[arg(long, default_value_t = 1)]
    interval: u64,

    /// Command to run while the display is asleep.
    #[arg(value_name = "COMMAND", required = true, trailing_var_arg = true)]
    command: Vec<String>,
}

fn run(cli: Cli) -> i32 {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let monitor = match DpmsMonitor::connect() {
        Ok(monitor) => monitor,
        Err(e) => {
            error!(error = %e, "failed to open display");
            return EXIT_FATAL;
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "failed to build runtime");
            return EXIT_FATAL;
        }
    };

    let mut supervisor = Supervisor::new(monitor, ChildSupervisor::new(cli.command));
    let tick = Duration::from_secs(cli.interval.max(1));
    match rt.block_on(supervisor.run(tick)) {
        Ok(()) => EXIT_OK,
        Err(e) => {
            error!(error = %e, "signal handling failed");
            EXIT_FATAL
        }
    }
}

fn main() {
    let cli = Cli::parse();
    process::exit(run(cli));
}
