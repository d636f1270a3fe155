//! Spendcast CLI - Personal expense tracker
//!
//! Usage:
//!   spendcast init                     Initialize database
//!   spendcast add -t Lunch -c Food ... Record an expense
//!   spendcast forecast                 Project the next 7 days
//!   spendcast serve --port 5000        Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            static_dir,
            allow_origins,
        } => {
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                cli.no_encrypt,
                static_dir.as_deref(),
                allow_origins,
            )
            .await
        }
        Commands::Add {
            title,
            category,
            amount,
            date,
            notes,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_add(&db, &title, &category, amount, &date, notes.as_deref())
        }
        Commands::List {
            category,
            search,
            from,
            to,
            json,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_list(
                &db,
                category.as_deref(),
                search.as_deref(),
                from.as_deref(),
                to.as_deref(),
                json,
            )
        }
        Commands::Update {
            id,
            title,
            category,
            amount,
            date,
            notes,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_update(&db, id, title, category, amount, date.as_deref(), notes)
        }
        Commands::Delete { id } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_delete(&db, id)
        }
        Commands::ByDate => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_by_date(&db)
        }
        Commands::Categories => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_categories(&db)
        }
        Commands::Forecast { now, json } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_forecast(&db, now.as_deref(), json)
        }
        Commands::Import { file } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_import(&db, &file)
        }
        Commands::Export { output } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_export(&db, output.as_deref())
        }
        Commands::Audit { limit } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_audit(&db, limit)
        }
    }
}
