use forge_common::error::ForgeError;
use forge_operator::error::ForgeOperatorError;
use thiserror::Error;

pub type ForgeCliResult<T = (), E = ForgeCliError> = Result<T, E>;

#[derive(Debug, Error)]
pub enum ForgeCliError {
    #[error("Unable to initialize config: {0}")]
    InitConfig(String),
    #[error("Operator error: {0}")]
    Operator(#[from] ForgeOperatorError),
    #[error("Unable to render yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl From<ForgeError> for ForgeCliError {
    fn from(error: ForgeError) -> Self {
        match error {
            ForgeError::Config(_)
            | ForgeError::InvalidSetting { .. }
            | ForgeError::ConfigAlreadyInitialized
            | ForgeError::ConfigNotInitialized => ForgeCliError::InitConfig(error.to_string()),
            other => ForgeCliError::Runtime(other.to_string()),
        }
    }
}
