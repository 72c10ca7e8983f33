use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::process::ExitCode;

use skewer::engine::{Engine, EngineConfig};
use skewer::uci;

fn main() -> ExitCode {
    skewer::logger::init("logs/skewer.log", "info");

    let mut engine = Engine::new(EngineConfig::default());
    let stdin = io::stdin();
    let stdout = io::stdout();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        uci::run_loop(&mut engine, stdin.lock(), stdout.lock())
    }));

    match outcome {
        Ok(Ok(())) => ExitCode::SUCCESS,
        Ok(Err(err)) => {
            tracing::error!("I/O failure on the command stream: {err}");
            ExitCode::FAILURE
        }
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::error!("fatal invariant violation: {message}");
            ExitCode::FAILURE
        }
    }
}
