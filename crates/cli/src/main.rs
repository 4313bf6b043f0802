// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nodeward` - lifecycle commands for the node agent (§6): install,
//! uninstall, run in the foreground, and report status.

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "nodeward", version, about = "Node agent lifecycle commands")]
struct Cli {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the directory tree and record the installed version.
    Install,
    /// Remove the directory tree after checking version compatibility.
    Uninstall {
        /// Skip the installed-version compatibility check.
        #[arg(long)]
        force: bool,
    },
    /// Run the watchdog and its managed components in the foreground.
    Run,
    /// Report the installed version, directory layout, and backlog sizes.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Install => commands::install::run(cli.format),
        Command::Uninstall { force } => commands::uninstall::run(force, cli.format),
        Command::Run => commands::run::run().await,
        Command::Status => commands::status::run(cli.format),
    };

    if let Err(e) = &result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
    Ok(())
}
