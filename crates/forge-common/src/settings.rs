use std::{env, path::PathBuf, sync::OnceLock, time::Duration};

use anyhow::Context;
use config::{Environment, File};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs::canonicalize;

pub static CONFIG_INSTANCE: OnceLock<Settings> = OnceLock::new();

use crate::error::{ForgeError, ForgeResult};

/// Prefix for environment overrides, e.g. `APPFORGE__OPERATOR__CONCURRENCY=8`.
pub const ENV_PREFIX: &str = "APPFORGE";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct OperatorSettings {
    /// Restrict the watch to a single namespace. `None` watches every namespace.
    #[serde(default)]
    pub namespace: Option<String>,

    /// Upper bound on reconciliations running at once across distinct Apps.
    #[serde(default = "default_concurrency")]
    pub concurrency: u16,

    #[serde(default = "default_error_requeue_secs")]
    pub error_requeue_secs: u64,

    #[serde(default = "default_terminal_requeue_secs")]
    pub terminal_requeue_secs: u64,

    /// Deadline applied to every individual API server round-trip.
    #[serde(default = "default_store_timeout_secs")]
    pub store_timeout_secs: u64,

    #[serde(default = "default_field_manager")]
    pub field_manager: String,
}

impl Default for OperatorSettings {
    fn default() -> Self {
        Self {
            namespace: None,
            concurrency: default_concurrency(),
            error_requeue_secs: default_error_requeue_secs(),
            terminal_requeue_secs: default_terminal_requeue_secs(),
            store_timeout_secs: default_store_timeout_secs(),
            field_manager: default_field_manager(),
        }
    }
}

impl OperatorSettings {
    pub fn error_requeue(&self) -> Duration {
        Duration::from_secs(self.error_requeue_secs)
    }

    pub fn terminal_requeue(&self) -> Duration {
        Duration::from_secs(self.terminal_requeue_secs)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }

    /// A zero deadline would fail every API call before it is sent.
    pub fn validate(&self) -> ForgeResult {
        if self.store_timeout_secs == 0 {
            return Err(ForgeError::InvalidSetting {
                key: "operator.store_timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_log_level")]
    pub log_level: LevelFilter,

    #[serde(default = "OperatorSettings::default")]
    pub operator: OperatorSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            operator: OperatorSettings::default(),
        }
    }
}

pub fn get_config() -> ForgeResult<&'static Settings> {
    CONFIG_INSTANCE.get().ok_or(ForgeError::ConfigNotInitialized)
}

pub fn set_config(settings: Settings) -> ForgeResult<&'static Settings> {
    CONFIG_INSTANCE
        .set(settings)
        .map_err(|_| ForgeError::ConfigAlreadyInitialized)?;
    get_config()
}

impl Settings {
    /// Layers every configuration source on top of the defaults. `root` may
    /// point at a settings file or at a directory holding a `config.*` file.
    pub fn from_root(root: Option<PathBuf>) -> ForgeResult<Self> {
        let curr_dir = std::env::current_dir().context("unable to get working directory")?;
        let root = root.unwrap_or(curr_dir);
        let root = canonicalize(root).context("unable to canonicalize root directory")?;

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let mut s = config::Config::builder();
        if root.is_file() {
            s = s.add_source(File::from(root.as_path()));
        }
        let s = s
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config.{}", run_mode)).required(false))
            .add_source(File::with_name(&root.join("config").to_string_lossy()).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Settings = s.try_deserialize()?;
        cfg.operator.validate()?;
        Ok(cfg)
    }
}

fn default_log_level() -> LevelFilter {
    LevelFilter::Info
}

fn default_concurrency() -> u16 {
    4
}

fn default_error_requeue_secs() -> u64 {
    5
}

fn default_terminal_requeue_secs() -> u64 {
    300
}

fn default_store_timeout_secs() -> u64 {
    30
}

fn default_field_manager() -> String {
    "appforge".to_string()
}
