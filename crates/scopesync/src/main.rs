mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use scopesync_api::ApiClient;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
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
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a controller connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "scopesync", &mut std::io::stdout());
            Ok(())
        }

        // All other commands require an authenticated controller session
        cmd => {
            let conn = config::resolve_connection(&cli.global)?;
            let (client, profile) =
                ApiClient::connect(&conn.controller, &conn.credentials, &conn.transport).await?;

            if !cli.global.quiet {
                eprintln!(
                    "scopesync v{} ({}) -- tenant: {}",
                    env!("CARGO_PKG_VERSION"),
                    conn.controller,
                    profile.tenant_name.as_deref().unwrap_or("-"),
                );
            }

            tracing::debug!(command = ?cmd, "dispatching command");
            let result = commands::dispatch(cmd, &client, &cli.global).await;

            // End sessions the program itself created; a long-lived
            // operator token must survive the run.
            if client.owns_session() {
                if let Err(e) = client.logout().await {
                    tracing::debug!("logout failed: {e}");
                }
            }

            result
        }
    }
}
