//! Expense command implementations

use anyhow::{Context, Result};
use chrono::NaiveDate;
use spendcast_core::db::Database;
use spendcast_core::models::{parse_incurred_on, ExpenseUpdate, NewExpense};
use spendcast_core::ExpenseFilter;

use super::{truncate, CLI_ACTOR};

fn parse_filter_date(value: Option<&str>, flag: &str) -> Result<Option<NaiveDate>> {
    value
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .with_context(|| format!("Invalid --{} date format (use YYYY-MM-DD)", flag))
}

pub fn cmd_add(
    db: &Database,
    title: &str,
    category: &str,
    amount: f64,
    date: &str,
    notes: Option<&str>,
) -> Result<()> {
    let incurred_on = parse_incurred_on(date).context("Invalid --date")?;

    let mut new_expense = NewExpense::new(title, category, amount, incurred_on);
    if let Some(notes) = notes {
        new_expense = new_expense.with_notes(notes);
    }

    let expense = db
        .insert_expense(&new_expense)
        .context("Failed to add expense")?;

    db.log_audit(
        CLI_ACTOR,
        "create",
        Some("expense"),
        Some(expense.id),
        Some(&format!("title={}, amount={}", expense.title, expense.amount)),
    )?;

    println!(
        "✅ Added expense {}: {} │ ${:.2} │ {} ({})",
        expense.id,
        expense.incurred_on.format("%Y-%m-%d"),
        expense.amount,
        expense.title,
        expense.category
    );

    Ok(())
}

pub fn cmd_list(
    db: &Database,
    category: Option<&str>,
    search: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
    json: bool,
) -> Result<()> {
    let filter = ExpenseFilter::new()
        .category(category)
        .search(search)
        .from(parse_filter_date(from, "from")?)
        .to(parse_filter_date(to, "to")?);

    let expenses = if filter.is_empty() {
        db.list_expenses()?
    } else {
        db.search_expenses(&filter)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&expenses)?);
        return Ok(());
    }

    if expenses.is_empty() {
        println!("No expenses found. Add one with:");
        println!("  spendcast add -t Lunch -c Food -a 12.50 -d 2024-01-06");
        return Ok(());
    }

    println!();
    println!("📝 Expenses");
    println!("   ─────────────────────────────────────────────────────────────");

    for expense in &expenses {
        println!(
            "   [{}] {} │ {:>10} │ {:<12} │ {}",
            expense.id,
            expense.incurred_on.format("%Y-%m-%d"),
            format!("${:.2}", expense.amount),
            truncate(&expense.category, 12),
            truncate(&expense.title, 35)
        );
    }

    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {} expenses, ${:.2} total", expenses.len(), total);

    Ok(())
}

pub fn cmd_update(
    db: &Database,
    id: i64,
    title: Option<String>,
    category: Option<String>,
    amount: Option<f64>,
    date: Option<&str>,
    notes: Option<String>,
) -> Result<()> {
    let incurred_on = date
        .map(parse_incurred_on)
        .transpose()
        .context("Invalid --date")?;

    let update = ExpenseUpdate {
        title,
        category,
        amount,
        incurred_on,
        notes,
    };

    if update.is_empty() {
        anyhow::bail!("Nothing to update. Pass at least one of --title, --category, --amount, --date, --notes");
    }

    let expense = db
        .update_expense(id, &update)
        .context("Failed to update expense")?
        .ok_or_else(|| anyhow::anyhow!("Expense {} not found", id))?;

    db.log_audit(
        CLI_ACTOR,
        "update",
        Some("expense"),
        Some(id),
        Some(&format!("title={}, amount={}", expense.title, expense.amount)),
    )?;

    println!(
        "✅ Updated expense {}: {} │ ${:.2} │ {} ({})",
        expense.id,
        expense.incurred_on.format("%Y-%m-%d"),
        expense.amount,
        expense.title,
        expense.category
    );

    Ok(())
}

pub fn cmd_delete(db: &Database, id: i64) -> Result<()> {
    let expense = db
        .delete_expense(id)?
        .ok_or_else(|| anyhow::anyhow!("Expense {} not found", id))?;

    db.log_audit(
        CLI_ACTOR,
        "delete",
        Some("expense"),
        Some(id),
        Some(&format!("title={}", expense.title)),
    )?;

    println!("🗑️  Deleted expense {}: {}", id, expense.title);

    Ok(())
}
