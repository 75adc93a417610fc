use std::path::PathBuf;

use clap::{Parser, Subcommand};
use forge_common::{
    level_filters::LevelFilter,
    util::tracing::{level_from_log, setup_tracing},
};

use crate::{error::ForgeCliResult, init::init_config};

mod crd;
mod info;
mod reconcile;
mod run;

#[derive(Debug, Parser)]
#[command(name = "af", version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Overrides the level from the settings file
    #[clap(short('l'), long, value_name("LEVEL"))]
    pub log_level: Option<LevelFilter>,

    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    #[command(about = "Show information about appforge")]
    Info(info::InfoArgs),
    #[command(about = "Run the App controller", alias = "operator")]
    Run(run::RunArgs),
    #[command(about = "Reconcile a single App once and exit", alias = "r")]
    Reconcile(reconcile::ReconcileArgs),
    #[command(about = "Print the App CustomResourceDefinition")]
    Crd(crd::CrdArgs),
}

pub async fn exec() -> ForgeCliResult {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let cfg = init_config(&cli)?;
    let level = cli
        .log_level
        .unwrap_or_else(|| level_from_log(cfg.log_level));
    setup_tracing(Some(level)).await?;

    match cli.cmd {
        Command::Info(args) => info::run(args, cfg).await?,
        Command::Run(args) => run::run(args, cfg).await?,
        Command::Reconcile(args) => reconcile::run(args, cfg).await?,
        Command::Crd(args) => crd::run(args, cfg).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from([
            "af",
            "-l",
            "debug",
            "run",
            "--namespace",
            "apps",
            "--concurrency",
            "2",
        ])
        .unwrap();
        assert_eq!(cli.log_level, Some(LevelFilter::DEBUG));
        match cli.cmd {
            Command::Run(args) => {
                assert_eq!(args.namespace.as_deref(), Some("apps"));
                assert_eq!(args.concurrency, Some(2));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_reconcile_defaults_namespace() {
        let cli = Cli::try_parse_from(["af", "reconcile", "--name", "web"]).unwrap();
        match cli.cmd {
            Command::Reconcile(args) => {
                assert_eq!(args.name, "web");
                assert_eq!(args.namespace, "default");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_operator_alias() {
        let cli = Cli::try_parse_from(["af", "operator"]).unwrap();
        assert!(matches!(cli.cmd, Command::Run(_)));
    }

    #[test]
    fn test_requires_subcommand() {
        assert!(Cli::try_parse_from(["af"]).is_err());
    }
}
