//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Spendcast - Track expenses and see the week ahead
#[derive(Parser)]
#[command(name = "spendcast")]
#[command(about = "Personal expense tracker with a 7-day spending forecast", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "spendcast.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set SPENDCAST_DB_KEY environment variable with your passphrase.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Record a new expense
    Add {
        /// Short description
        #[arg(short, long)]
        title: String,

        /// Category (free-form)
        #[arg(short, long)]
        category: String,

        /// Amount spent
        #[arg(short, long, allow_hyphen_values = true)]
        amount: f64,

        /// Date incurred (YYYY-MM-DD or RFC 3339)
        #[arg(short, long)]
        date: String,

        /// Optional notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// List expenses, newest first
    List {
        /// Only this category
        #[arg(long)]
        category: Option<String>,

        /// Match title or notes (substring)
        #[arg(short, long)]
        search: Option<String>,

        /// Start date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Change fields of an existing expense
    Update {
        /// Expense ID
        id: i64,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long, allow_hyphen_values = true)]
        amount: Option<f64>,

        /// Date incurred (YYYY-MM-DD or RFC 3339)
        #[arg(short, long)]
        date: Option<String>,

        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: i64,
    },

    /// Show spending grouped by day
    ByDate,

    /// Show total spending per category
    Categories,

    /// Project spending for the next 7 days
    Forecast {
        /// Reference date (defaults to now)
        #[arg(long)]
        now: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Import expenses from CSV (title,category,amount,incurred_on,notes)
    Import {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Export expenses to CSV
    Export {
        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the audit log
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "50")]
        limit: i64,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "5000", env = "PORT")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Allowed CORS origin; repeat or comma-separate, "*" for any
        #[arg(
            long = "allow-origin",
            env = "SPENDCAST_ALLOWED_ORIGINS",
            value_delimiter = ','
        )]
        allow_origins: Vec<String>,
    },
}
