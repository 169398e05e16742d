mod app;
mod cli;
mod commands;
mod format;
mod interactive;

use std::process::ExitCode;

use clap::Parser;
use oasis_core::config::AppConfig;
use oasis_core::OasisError;

use crate::app::App;
use crate::cli::{Cli, Command, ThemeAction, WatchlistAction};

/// Logs go to stderr; with `logging.file` also to a daily file. The guard
/// must outlive the runtime so buffered lines are flushed.
fn init_tracing(config: &AppConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("oasis_cli=info,oasis_core=info,oasis_api=warn"));
    let stderr = fmt::layer().with_writer(std::io::stderr).with_target(false);

    if !config.logging.file {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr)
            .init();
        return None;
    }

    let logs_dir = AppConfig::log_dir();
    std::fs::create_dir_all(&logs_dir).ok();
    let file_appender = tracing_appender::rolling::daily(&logs_dir, "oasis.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();
    Some(guard)
}

async fn run(cli: Cli, config: AppConfig) -> Result<(), OasisError> {
    let mut app = App::open(config)?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Command::Trending { page } => commands::trending(&app, page, &mut out).await,
        Command::Browse {
            search,
            genre,
            sort,
            pages,
            watchlist,
        } => commands::browse(&app, search, genre, sort, pages, watchlist, &mut out).await,
        Command::Show { id } => commands::show(&app, id, &mut out).await,
        Command::Genres { remote } => commands::genres(&app, remote, &mut out).await,
        Command::Watchlist { action } => {
            let action = action.unwrap_or(WatchlistAction::List);
            commands::watchlist(&mut app, action, &mut out).await
        }
        Command::Theme { action } => {
            commands::theme(&mut app, action.unwrap_or(ThemeAction::Show), &mut out)
        }
        Command::Login { credential } => commands::login(&mut app, &credential, &mut out),
        Command::Logout => commands::logout(&mut app, &mut out),
        Command::Whoami => commands::whoami(&app, &mut out),
        Command::Interactive => {
            drop(out);
            interactive::run(&mut app).await
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("oasis: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(endpoint) = &cli.endpoint {
        config.catalog.api_url = endpoint.clone();
        if let Err(e) = config.validate() {
            eprintln!("oasis: {e}");
            return ExitCode::FAILURE;
        }
    }

    let _guard = init_tracing(&config);
    tracing::debug!(api_url = %config.catalog.api_url, "starting");

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("oasis: {e}");
            ExitCode::FAILURE
        }
    }
}
