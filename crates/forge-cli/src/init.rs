use forge_common::{
    error::ForgeResult,
    settings::{set_config, Settings},
};

use crate::Cli;

/// An explicit settings file wins over the root directory.
pub fn init_config(cli: &Cli) -> ForgeResult<&'static Settings> {
    let settings = match &cli.settings {
        None => Settings::from_root(cli.root.clone())?,
        Some(settings) => Settings::from_root(Some(settings.clone()))?,
    };
    set_config(settings)
}
