use clap::Parser;
use forge_common::settings::Settings;

use crate::error::ForgeCliResult;

#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Only watch Apps in this namespace
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Maximum number of Apps reconciled at once
    #[arg(short, long)]
    pub concurrency: Option<u16>,
}

pub async fn run(args: RunArgs, config: &Settings) -> ForgeCliResult<()> {
    let mut settings = config.operator.clone();
    if let Some(namespace) = args.namespace {
        settings.namespace = Some(namespace);
    }
    if let Some(concurrency) = args.concurrency {
        settings.concurrency = concurrency;
    }
    forge_operator::operator(&settings).await?;
    Ok(())
}
