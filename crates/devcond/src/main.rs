use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use signal_hook::consts::{SIGINT, SIGTERM};

use devcond::{StructuredHealthReporter, SystemConfigLoader, TracingCommandSink, bootstrap_with};

fn main() -> ExitCode {
    let stop = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM] {
        if let Err(error) = signal_hook::flag::register(signal, Arc::clone(&stop)) {
            eprintln!("devcond: failed to install handler for signal {signal}: {error}");
            return ExitCode::FAILURE;
        }
    }

    match bootstrap_with(
        &SystemConfigLoader,
        Arc::new(StructuredHealthReporter::new()),
        TracingCommandSink,
    ) {
        Ok(daemon) => {
            daemon.run_until(&stop);
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("devcond: {error}");
            ExitCode::FAILURE
        }
    }
}
