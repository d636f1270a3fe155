//! Audit log command

use anyhow::Result;
use spendcast_core::db::Database;

use super::truncate;

pub fn cmd_audit(db: &Database, limit: i64) -> Result<()> {
    let entries = db.list_audit_log(limit.max(1))?;

    if entries.is_empty() {
        println!("Audit log is empty.");
        return Ok(());
    }

    println!();
    println!("🧾 Audit Log");
    println!("   ─────────────────────────────────────────────────────────────");

    for entry in entries {
        let target = match (entry.entity_type.as_deref(), entry.entity_id) {
            (Some(kind), Some(id)) => format!("{} {}", kind, id),
            (Some(kind), None) => kind.to_string(),
            _ => String::new(),
        };
        println!(
            "   {} │ {:<4} │ {:<8} │ {:<16} │ {}",
            entry.timestamp,
            entry.actor,
            entry.action,
            target,
            truncate(entry.details.as_deref().unwrap_or(""), 40)
        );
    }

    Ok(())
}
