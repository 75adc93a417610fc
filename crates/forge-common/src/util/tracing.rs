use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::error::{ForgeError, ForgeResult};

/// Installs the global subscriber. `RUST_LOG` wins over `level` when set.
pub async fn setup_tracing(level: Option<LevelFilter>) -> ForgeResult {
    let level = level.unwrap_or(LevelFilter::INFO);
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| ForgeError::Tracing(e.to_string()))
}

/// Maps a `log` level, as stored in the settings file, onto `tracing`'s.
pub fn level_from_log(level: log::LevelFilter) -> LevelFilter {
    match level {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    }
}
