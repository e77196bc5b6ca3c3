mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use bbox_api::BboxClient;
use bbox_config::TlsSetting;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

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
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need the router
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Read(cmd) => {
            let mut client = build_client(&cli.global)?;
            commands::dispatch(cmd, &mut client, &cli.global).await
        }
    }
}

/// Build a client from the config file with CLI flag overrides.
fn build_client(global: &GlobalOpts) -> Result<BboxClient, CliError> {
    let mut cfg = bbox_config::load_config()?;

    if let Some(ref url) = global.base_url {
        cfg.base_url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
    if global.insecure {
        cfg.tls = TlsSetting::Insecure;
    }

    let client_config = bbox_config::to_client_config(&cfg)?;
    let password = bbox_config::resolve_password(&cfg)?;

    tracing::debug!(base_url = %client_config.base_url, timeout = ?client_config.timeout, "client configured");
    Ok(BboxClient::new(password, client_config))
}
