mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use clientela_core::SyncController;

use crate::cli::{Cli, Command};
use crate::commands::util::{ConsoleNotifier, PromptConfirmer};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Local-only commands
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),
        Command::Check(args) => commands::check::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "clientela", &mut std::io::stdout());
            Ok(())
        }

        // Everything else talks to the registry service
        cmd => {
            let service_config = config::resolve_service_config(&cli.global)?;
            let color = output::should_color(&cli.global.color);
            let controller = SyncController::from_config(
                &service_config,
                Arc::new(ConsoleNotifier::new(cli.global.quiet, color)),
                Arc::new(PromptConfirmer::new(cli.global.yes)),
            )?;

            tracing::debug!(command = ?cmd, url = %service_config.url, "dispatching command");
            commands::dispatch(cmd, &controller, &cli.global).await
        }
    }
}
