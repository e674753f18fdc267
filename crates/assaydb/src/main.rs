//! Command-line interface for assaydb stores.

use std::process::ExitCode;

use clap::Parser;

mod cli;

use cli::args::{Cli, Commands};
use cli::commands;

fn main() -> ExitCode {
    // Diagnostics go to stderr so table and JSON output stay clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search { query, json, store } => commands::search::run(&query, json, &store.store),
        Commands::Translate { query, terms } => commands::translate::run(&query, terms),
        Commands::Add {
            field,
            comparison,
            value,
            query,
            or,
            synonyms,
        } => commands::add::run(&field, &comparison, &value, &query, or, synonyms),
        Commands::Fields => commands::fields::run(),
        Commands::Insert { file, store } => commands::insert::run(&file, &store.store),
        Commands::Update {
            id,
            set,
            add_results,
            remove_results,
            store,
        } => commands::update::run(&id, &set, &add_results, &remove_results, &store.store),
        Commands::History { id, store } => commands::history::run(&id, &store.store),
    }
}
