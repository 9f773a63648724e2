//! Log setup.
//!
//! The TUI owns the terminal, so logs go to a file or nowhere.

use std::{fs::OpenOptions, io, path::Path};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a subscriber that appends to `path`.
///
/// `RUST_LOG` takes precedence over `default_filter`. The returned guard
/// flushes buffered lines when dropped, so hold it until exit.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init(path: &Path, default_filter: &str) -> io::Result<WorkerGuard> {
    let mut options = OpenOptions::new();
    options.create(true).append(true);

    // Owner read/write only.
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let file = options.open(path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let layer = tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false);

    let _ = tracing_subscriber::registry().with(layer).with(filter).try_init();
    Ok(guard)
}
