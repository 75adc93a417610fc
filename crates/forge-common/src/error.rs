pub type ForgeResult<T = (), E = ForgeError> = Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ForgeError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid setting {key}: {reason}")]
    InvalidSetting { key: &'static str, reason: String },
    #[error("Config not initialized")]
    ConfigNotInitialized,
    #[error("Config already initialized")]
    ConfigAlreadyInitialized,
    #[error("Runtime error: {0}")]
    Runtime(#[from] anyhow::Error),
    #[error("Tracing error: {0}")]
    Tracing(String),
}
