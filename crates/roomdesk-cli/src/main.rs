//! roomdesk CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing::Level;

use roomdesk_cli::cli::{Cli, Command, ConfigAction};
use roomdesk_cli::commands;
use roomdesk_cli::config::Config;
use roomdesk_cli::error::CliResult;
use roomdesk_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let debug = cli.debug || config.debug;
    let tracing_config = match (cli.json_logs, debug) {
        (true, true) => TracingConfig::structured().with_level(Level::DEBUG),
        (true, false) => TracingConfig::structured(),
        (false, true) => TracingConfig::debug(),
        (false, false) => TracingConfig::terminal(),
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: Config) -> CliResult<()> {
    let base_url = cli.base_url.as_deref();
    let csrf_token = cli.csrf_token.as_deref();

    match cli.command {
        Command::Create { room, start, end } => {
            let client = config.backend.to_client_config(base_url, csrf_token)?;
            commands::reservations::create(client, room, start, end).await
        }
        Command::Update {
            pk,
            room,
            start,
            end,
        } => {
            let client = config.backend.to_client_config(base_url, csrf_token)?;
            commands::reservations::update(client, pk, room, start, end).await
        }
        Command::Delete { pk } => {
            let client = config.backend.to_client_config(base_url, csrf_token)?;
            commands::reservations::delete(client, pk).await
        }
        Command::Filter { ref page, room, html } => commands::filter::run(page, room, html),
        Command::Session { ref page } => {
            commands::session::run(&config, base_url, csrf_token, page.as_deref()).await
        }
        Command::Config { ref action } => match action {
            ConfigAction::Dump => commands::config::dump(&config),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(),
        },
    }
}
