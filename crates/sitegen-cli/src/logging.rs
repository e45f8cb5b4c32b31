//! Tracing subscriber setup

use crate::args::LogFormatArg;
use sitegen_core::config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber, writing to stderr
///
/// `RUST_LOG` wins over `logging.level`; `--log-format` wins over
/// `logging.format`.
pub fn init(config: &LoggingConfig, format: Option<LogFormatArg>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format.map(LogFormat::from).unwrap_or(config.format) {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
