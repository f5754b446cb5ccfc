//! Logging setup: stderr plus a daily rolling file under `~/.a2hs/logs/`.
//!
//! `A2HS_DEBUG_LOG=1` forces debug level; otherwise `RUST_LOG` or `info`.

use std::env;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "a2hs.log";

fn env_filter() -> EnvFilter {
    let debug_enabled = env::var("A2HS_DEBUG_LOG")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false);
    if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Keep the returned guard alive for the whole process or buffered file
/// output is lost.
pub fn init(logs_dir: &Path) -> Option<WorkerGuard> {
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    if fs_ready(logs_dir) {
        let appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let file_layer = fmt::layer().with_writer(writer).with_ansi(false);
        tracing_subscriber::registry()
            .with(env_filter())
            .with(stderr_layer)
            .with(file_layer)
            .init();
        Some(guard)
    } else {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(stderr_layer)
            .init();
        None
    }
}

fn fs_ready(dir: &Path) -> bool {
    fs_err::create_dir_all(dir).is_ok()
}
