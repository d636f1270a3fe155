//! CSV import and export commands

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use spendcast_core::db::Database;
use spendcast_core::{parse_csv, write_csv};
use tracing::info;

use super::CLI_ACTOR;

/// Import expenses from a CSV file
///
/// Rows with unparseable dates or missing fields are skipped and reported.
pub fn cmd_import(db: &Database, file: &Path) -> Result<()> {
    println!("📥 Importing expenses from {}...", file.display());

    let reader = File::open(file)
        .with_context(|| format!("Failed to open file: {}", file.display()))?;
    let import = parse_csv(BufReader::new(reader)).context("Failed to read CSV")?;

    // All-or-nothing: a store failure leaves no partial import behind
    let imported = db
        .insert_expenses(&import.expenses)
        .context("Failed to store imported expenses, nothing was imported")?;

    info!(
        imported,
        skipped = import.skipped.len(),
        file = %file.display(),
        "CSV import finished"
    );

    db.log_audit(
        CLI_ACTOR,
        "import",
        Some("expense"),
        None,
        Some(&format!(
            "file={}, imported={}, skipped={}",
            file.display(),
            imported,
            import.skipped.len()
        )),
    )?;

    println!("✅ Imported {} expenses", imported);
    if !import.skipped.is_empty() {
        println!("   ⚠️  Skipped {} rows:", import.skipped.len());
        for row in &import.skipped {
            println!("      line {}: {}", row.line, row.reason);
        }
    }

    Ok(())
}

/// Export every expense as CSV to a file, or stdout when no file is given
pub fn cmd_export(db: &Database, output: Option<&Path>) -> Result<()> {
    let expenses = db.list_expenses()?;

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_csv(BufWriter::new(file), &expenses)?;
            println!("✅ Exported {} expenses to {}", expenses.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_csv(&mut handle, &expenses)?;
            handle.flush()?;
        }
    }

    db.log_audit(
        CLI_ACTOR,
        "export",
        Some("expense"),
        None,
        Some(&format!("count={}", expenses.len())),
    )?;

    Ok(())
}
