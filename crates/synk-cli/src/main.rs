//! Synk CLI - the household organizer from the terminal
//!
//! Every command works on the local copy first and mirrors the result to the
//! shared remote record when one is configured.

mod cli;
mod commands;
mod config;
mod error;

#[cfg(test)]
mod tests;

use clap::{CommandFactory, Parser};

use crate::cli::{Cli, Commands};
use crate::commands::common::{resolve_db_path, CliContext};
use crate::config::CliConfig;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "synk=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db_path = resolve_db_path(cli.db_path);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    match command {
        Commands::Config { command } => commands::config::run_config(command, &db_path)?,
        Commands::Completions { shell, output } => {
            commands::completions::run_completions(shell, output.as_deref())?;
        }
        command => {
            let settings = if cli.offline {
                synk_core::SyncSettings::default()
            } else {
                CliConfig::load()?.sync_settings_from_env()?
            };
            let context = CliContext::new(db_path, settings);
            run_document_command(command, &context).await?;
        }
    }

    Ok(())
}

async fn run_document_command(command: Commands, context: &CliContext) -> Result<(), CliError> {
    match command {
        Commands::Add { entry } => commands::add::run_add(entry, context).await,
        Commands::List {
            collection,
            date,
            json,
        } => commands::list::run_list(collection, date.as_deref(), json, context).await,
        Commands::Toggle { collection, id } => {
            commands::toggle::run_toggle(collection, &id, context).await
        }
        Commands::Delete { collection, id } => {
            commands::delete::run_delete(collection, &id, context).await
        }
        Commands::Edit { entry } => commands::edit::run_edit(entry, context).await,
        Commands::Export { output } => {
            commands::export::run_export(output.as_deref(), context).await
        }
        Commands::Import { path } => commands::import::run_import(&path, context).await,
        Commands::Status { json } => commands::status::run_status(json, context).await,
        Commands::Watch => commands::watch::run_watch(context).await,
        Commands::Config { .. } | Commands::Completions { .. } => Ok(()),
    }
}
