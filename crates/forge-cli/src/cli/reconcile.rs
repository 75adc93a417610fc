use clap::Parser;
use colored::Colorize;
use forge_common::settings::Settings;
use forge_operator::{operator::converge::Outcome, AppIdentity};

use crate::error::ForgeCliResult;

#[derive(Parser, Debug, Clone)]
pub struct ReconcileArgs {
    #[arg(long)]
    pub name: String,

    #[arg(short, long, default_value = "default")]
    pub namespace: String,
}

pub async fn run(args: ReconcileArgs, config: &Settings) -> ForgeCliResult<()> {
    let id = AppIdentity::new(&args.name, &args.namespace);
    let report = forge_operator::reconcile_once(&config.operator, &id).await?;

    if !report.found {
        println!("App {} not found, nothing to do", id.to_string().bold());
        return Ok(());
    }
    println!("App {}", id.to_string().bold());
    for (kind, outcome) in report.steps {
        let outcome = match outcome {
            Outcome::Created | Outcome::Updated => outcome.to_string().green(),
            Outcome::Skipped | Outcome::Absent | Outcome::Untouched => {
                outcome.to_string().dimmed()
            }
        };
        println!("  {:<12} {}", kind.to_string(), outcome);
    }
    Ok(())
}
