mod cli;
mod config;
mod db;
mod models;
mod phase;
mod prayer_times;
mod signage;
mod tui;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use rusqlite::Connection;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use db::migrations::run_migrations;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Loading config")?;

    AppConfig::ensure_data_dir()?;
    let db_path = AppConfig::db_path()?;
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;

    // `import` from another shell may write while `watch` or the TUI reads.
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    run_migrations(&conn)?;

    let feed = cli.feed.as_deref();
    match cli.command {
        Some(Commands::Times) => handlers::handle_times(&conn, &config, feed)?,
        Some(Commands::Status { at, json }) => {
            handlers::handle_status(&conn, &config, feed, at.as_deref(), json)?
        }
        Some(Commands::Watch) => handlers::handle_watch(&conn, &config, feed)?,
        Some(Commands::Import { path }) => handlers::handle_import(&conn, &path)?,
        Some(Commands::Cache { action }) => handlers::handle_cache(&conn, &action)?,

        // No subcommand → launch the signage TUI
        None => tui::app::run(conn, config, cli.feed.clone())?,
    }

    Ok(())
}
