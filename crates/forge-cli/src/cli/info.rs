use clap::Parser;
use colored::Colorize;
use forge_common::settings::Settings;

use crate::error::ForgeCliResult;

#[derive(Parser, Debug, Clone)]
pub struct InfoArgs {}

pub async fn run(_args: InfoArgs, config: &Settings) -> ForgeCliResult<()> {
    let sha = option_env!("VERGEN_GIT_SHA").unwrap_or("unknown");
    println!(
        "{} {} ({}, built {})",
        "appforge".bold(),
        env!("CARGO_PKG_VERSION"),
        &sha[..sha.len().min(8)],
        option_env!("VERGEN_BUILD_DATE").unwrap_or("unknown"),
    );
    println!(
        "rustc {}",
        option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown")
    );
    println!(
        "watching {} with field manager {}",
        config
            .operator
            .namespace
            .as_deref()
            .unwrap_or("all namespaces")
            .cyan(),
        config.operator.field_manager.cyan()
    );
    Ok(())
}
