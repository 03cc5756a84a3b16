use std::{path::Path, sync::LazyLock};

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::{
    EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Prefix of the daily log files.
pub const LOG_FILE_PREFIX: &str = "studylog";

/// Installs the subscriber for a single command run. Events go to a daily rotated file in
/// `logs_path`, and to stderr as well with `show_std`.
pub fn enable_logging(
    logs_path: &Path,
    log_level: Option<LevelFilter>,
    show_std: bool,
) -> Result<()> {
    let appender = tracing_appender::rolling::Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(5)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .build(logs_path)?;

    let directive = filter_directive(log_level);

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(appender)
        .with_filter(EnvFilter::new(&directive));
    let stderr_layer = show_std.then(|| {
        fmt::layer()
            .compact()
            .without_time()
            .with_writer(std::io::stderr)
            .with_filter(EnvFilter::new(&directive))
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()?;
    Ok(())
}

/// Crate scoped filter. An explicit level wins over `RUST_LOG`, which wins over `info`.
fn filter_directive(log_level: Option<LevelFilter>) -> String {
    let level = log_level
        .map(|v| v.to_string().to_lowercase())
        .unwrap_or_else(|| std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()));
    format!("{}={level}", env!("CARGO_PKG_NAME").replace('-', "_"))
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .compact()
        .init()
});
