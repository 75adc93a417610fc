use clap::Parser;
use forge_common::settings::Settings;
use forge_operator::App;
use kube::CustomResourceExt;

use crate::error::ForgeCliResult;

#[derive(Parser, Debug, Clone)]
pub struct CrdArgs {}

/// Prints the CRD so it can be piped into `kubectl apply -f -`.
pub async fn run(_args: CrdArgs, _config: &Settings) -> ForgeCliResult<()> {
    print!("{}", render()?);
    Ok(())
}

fn render() -> ForgeCliResult<String> {
    Ok(serde_yaml::to_string(&App::crd())?)
}
