//! Logging setup for the CLI.
//!
//! Logs go to stderr so stdout only carries results. `RUST_LOG` overrides the
//! default filter; `DEBUG_LOGGING=1` enables debug output for tethercalc crates.
//! With a log file configured, the same events are also appended to it.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const APP_DIR: &str = "tethercalc";

fn filter() -> EnvFilter {
    let directive = if std::env::var("DEBUG_LOGGING").is_ok() {
        "info,tethercalc_core=debug,tethercalc_cli=debug"
    } else {
        "info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
}

/// Relative log paths live in the platform config directory.
fn resolve_log_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match dirs::config_dir() {
        Some(config) => config.join(APP_DIR).join(path),
        None => path.to_path_buf(),
    }
}

fn stderr_layer<S>()
-> fmt::Layer<S, fmt::format::DefaultFields, fmt::format::Format, fn() -> std::io::Stderr> {
    fmt::layer()
        .with_writer(std::io::stderr as fn() -> std::io::Stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE)
}

/// Initialize stderr logging, plus a file layer when `log_file` is set.
///
/// The returned guard flushes the file writer on drop and must be held until
/// the process exits.
pub fn init(log_file: Option<&Path>) -> Option<WorkerGuard> {
    let Some(path) = log_file.map(resolve_log_path) else {
        tracing_subscriber::registry()
            .with(stderr_layer())
            .with(filter())
            .init();
        return None;
    };

    let (dir, name) = match (path.parent(), path.file_name()) {
        (Some(dir), Some(name)) => (dir.to_path_buf(), name.to_owned()),
        _ => {
            eprintln!("Invalid log file path {:?}, using stderr only", path);
            tracing_subscriber::registry()
                .with(stderr_layer())
                .with(filter())
                .init();
            return None;
        }
    };

    if let Err(e) = std::fs::create_dir_all(&dir) {
        // subscriber not initialized yet
        eprintln!(
            "Failed to create log directory {:?}: {}, using stderr only",
            dir, e
        );
        tracing_subscriber::registry()
            .with(stderr_layer())
            .with(filter())
            .init();
        return None;
    }

    let appender = tracing_appender::rolling::never(dir, name);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer())
        .with(filter())
        .init();

    tracing::debug!(log_file = ?path, "file logging enabled");
    Some(guard)
}
