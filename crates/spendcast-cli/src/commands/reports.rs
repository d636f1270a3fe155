//! Report command implementations

use anyhow::{Context, Result};
use chrono::Utc;
use spendcast_core::db::Database;
use spendcast_core::models::parse_incurred_on;

use super::{truncate, CLI_ACTOR};

pub fn cmd_by_date(db: &Database) -> Result<()> {
    let days = db.spending_by_day()?;

    db.log_audit(CLI_ACTOR, "report", Some("by_date"), None, None)?;

    if days.is_empty() {
        println!("No expenses recorded yet.");
        return Ok(());
    }

    println!();
    println!("📅 Spending by Day");
    println!("   ─────────────────────────────────────────────────────────────");

    for day in &days {
        println!("   {} │ ${:>10.2}", day.date, day.total);
        for expense in &day.entries {
            println!(
                "              ${:>10.2}   {} ({})",
                expense.amount,
                truncate(&expense.title, 30),
                expense.category
            );
        }
    }

    Ok(())
}

pub fn cmd_categories(db: &Database) -> Result<()> {
    let totals = db.spending_by_category()?;

    db.log_audit(CLI_ACTOR, "report", Some("categories"), None, None)?;

    if totals.is_empty() {
        println!("No expenses recorded yet.");
        return Ok(());
    }

    let grand_total: f64 = totals.values().sum();

    println!();
    println!("📊 Spending by Category");
    println!("   ─────────────────────────────────────────────────────────────");

    for (category, total) in &totals {
        let pct = if grand_total != 0.0 {
            total / grand_total * 100.0
        } else {
            0.0
        };
        println!(
            "   {:<20} │ ${:>10.2} │ {:>5.1}%",
            truncate(category, 20),
            total,
            pct
        );
    }

    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {:<20} │ ${:>10.2}", "Total", grand_total);

    Ok(())
}

pub fn cmd_forecast(db: &Database, now: Option<&str>, json: bool) -> Result<()> {
    let now = match now {
        Some(s) => parse_incurred_on(s).context("Invalid --now date")?,
        None => Utc::now(),
    };

    let history = db.forecast_history()?;
    let forecast = spendcast_core::forecast(&history, now);

    db.log_audit(
        CLI_ACTOR,
        "report",
        Some("forecast"),
        None,
        Some(&format!("history={}", history.len())),
    )?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "forecast": forecast }))?
        );
        return Ok(());
    }

    println!();
    println!("🔮 7-Day Forecast ({} past expenses)", history.len());
    println!("   ─────────────────────────────────────────────────────────────");

    for entry in &forecast {
        let weekday = chrono::NaiveDate::parse_from_str(&entry.date, "%Y-%m-%d")
            .map(|d| d.format("%a").to_string())
            .unwrap_or_default();
        println!(
            "   {} {} │ ${:>10.2}",
            weekday, entry.date, entry.predicted_expense
        );
    }

    let week_total: f64 = forecast.iter().map(|e| e.predicted_expense).sum();
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Week total     │ ${:>10.2}", week_total);

    Ok(())
}
