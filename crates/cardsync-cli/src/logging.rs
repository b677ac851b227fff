//! Tracing setup
//!
//! Everything goes to stderr. When `logging.file` is set the same events
//! are also appended, without ANSI colours, to that file through a
//! non-blocking writer whose guard must live until the process exits.

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cardsync_core::config::LoggingConfig;

/// Filter directive for a `-v` count, falling back to the configured level
pub fn filter_directive(verbose: u8, configured: &str) -> String {
    let level = match verbose {
        0 => configured,
        1 => "debug",
        _ => "trace",
    };
    format!("{level},hyper=warn,reqwest=warn,html5ever=warn,selectors=warn")
}

/// Installs the global subscriber
///
/// `RUST_LOG` takes precedence over both `-v` and the configuration.
pub fn init(verbose: u8, config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter_directive(verbose, &config.level)))
        .context("Invalid log filter")?;

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match &config.file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let file_name = path
                .file_name()
                .context("Log file path has no file name")?;

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
