mod commands;
mod config;
mod error;

use clap::Parser;

use crate::error::Result;

#[derive(Debug, Parser)]
#[command(name = "lotto")]
#[command(about = "Expand 2D/3D bet shorthand and reconcile edited slips")]
struct Cli {
    #[command(flatten)]
    overrides: config::Overrides,

    #[command(subcommand)]
    command: commands::Command,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = config::load(&cli.overrides)?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(format!(
            "lotto_cli={level},engine={level}",
            level = settings.level
        ))
        .init();

    tracing::debug!(width = settings.width, ledger = %settings.ledger, "loaded settings");
    commands::run(cli.command, &settings)
}
