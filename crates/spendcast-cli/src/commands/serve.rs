//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_encrypt: bool,
    static_dir: Option<&Path>,
    allow_origins: Vec<String>,
) -> Result<()> {
    println!("🚀 Starting Spendcast web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    // Flags and env values may both carry comma-separated lists
    let allowed_origins = spendcast_server::parse_origins(&allow_origins.join(","));
    if allowed_origins.is_empty() {
        println!("   🌐 CORS: same-origin only");
    } else {
        println!("   🌐 CORS: {}", allowed_origins.join(", "));
    }
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path, no_encrypt)?;

    let config = spendcast_server::ServerConfig { allowed_origins };

    let static_dir_str = static_dir
        .map(|p| p.to_str().context("static_dir path must be valid UTF-8"))
        .transpose()?;
    spendcast_server::serve(db, host, port, static_dir_str, config).await?;

    Ok(())
}
