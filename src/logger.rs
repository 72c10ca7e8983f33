//! Process-wide logging to a session file.

use std::path::Path;
use std::sync::OnceLock;

use tracing_subscriber::{fmt, EnvFilter};

static APPENDER_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
static INIT: OnceLock<()> = OnceLock::new();

/// Install the global subscriber, writing plain-text events to `path`.
///
/// Idempotent; later calls are no-ops. `RUST_LOG` overrides
/// `default_filter` when set. Falls back to stderr if the log file cannot
/// be opened, so a read-only working directory never kills the engine.
pub fn init<P: AsRef<Path>>(path: P, default_filter: &str) {
    INIT.get_or_init(|| {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }

        let filter = if std::env::var_os("RUST_LOG").is_some() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::try_new(default_filter).unwrap_or_else(|_| EnvFilter::new("info"))
        };

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path);

        match file {
            Ok(file) => {
                let (writer, guard) = tracing_appender::non_blocking(file);
                let _ = APPENDER_GUARD.set(guard);
                let subscriber = fmt()
                    .with_env_filter(filter)
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(writer)
                    .finish();
                let _ = tracing::subscriber::set_global_default(subscriber);
            }
            Err(_) => {
                let subscriber = fmt()
                    .with_env_filter(filter)
                    .with_ansi(false)
                    .with_writer(std::io::stderr)
                    .finish();
                let _ = tracing::subscriber::set_global_default(subscriber);
            }
        }
    });
}
