//! Expense operations

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use tracing::warn;

use super::expense_filter::ExpenseFilter;
use super::{format_timestamp, parse_timestamp, Database};
use crate::error::{Error, Result};
use crate::models::{Expense, ExpenseUpdate, NewExpense};

pub(super) const EXPENSE_COLUMNS: &str =
    "e.id, e.title, e.category, e.amount, e.incurred_on, e.notes, e.created_at";

/// An expense row as stored, before timestamp parsing
pub(super) struct ExpenseRow {
    id: i64,
    title: String,
    category: String,
    amount: f64,
    incurred_on: String,
    notes: String,
    created_at: String,
}

impl ExpenseRow {
    /// Read a row selected with [`EXPENSE_COLUMNS`]
    pub(super) fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            category: row.get(2)?,
            amount: row.get(3)?,
            incurred_on: row.get(4)?,
            notes: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
            created_at: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        })
    }

    /// Convert to an [`Expense`], skipping rows with unparseable timestamps
    pub(super) fn into_expense(self) -> Option<Expense> {
        let Some(incurred_on) = parse_timestamp(&self.incurred_on) else {
            warn!(
                id = self.id,
                incurred_on = %self.incurred_on,
                "Skipping expense with malformed incurred_on"
            );
            return None;
        };
        let Some(created_at) = parse_timestamp(&self.created_at) else {
            warn!(
                id = self.id,
                created_at = %self.created_at,
                "Skipping expense with malformed created_at"
            );
            return None;
        };

        Some(Expense {
            id: self.id,
            title: self.title,
            category: self.category,
            amount: self.amount,
            incurred_on,
            notes: self.notes,
            created_at,
        })
    }
}

impl Database {
    /// Insert a new expense and return the stored record
    pub fn insert_expense(&self, expense: &NewExpense) -> Result<Expense> {
        expense.validate()?;

        let id = {
            let conn = self.conn()?;
            conn.execute(
                r#"
                INSERT INTO expenses (title, category, amount, incurred_on, notes, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
                params![
                    expense.title.trim(),
                    expense.category.trim(),
                    expense.amount,
                    format_timestamp(expense.incurred_on),
                    expense.notes.as_deref().unwrap_or(""),
                    format_timestamp(Utc::now()),
                ],
            )?;
            conn.last_insert_rowid()
        };

        self.get_expense(id)?
            .ok_or_else(|| Error::NotFound(format!("Expense {} after insert", id)))
    }

    /// Insert a batch of expenses atomically, returning how many were stored
    ///
    /// Every record is validated before anything is written; a failure
    /// part-way through rolls the whole batch back.
    pub fn insert_expenses(&self, expenses: &[NewExpense]) -> Result<usize> {
        for expense in expenses {
            expense.validate()?;
        }

        let created_at = format_timestamp(Utc::now());
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO expenses (title, category, amount, incurred_on, notes, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )?;
            for expense in expenses {
                stmt.execute(params![
                    expense.title.trim(),
                    expense.category.trim(),
                    expense.amount,
                    format_timestamp(expense.incurred_on),
                    expense.notes.as_deref().unwrap_or(""),
                    created_at,
                ])?;
            }
        }
        tx.commit()?;

        Ok(expenses.len())
    }

    /// List all expenses, most recently incurred first
    pub fn list_expenses(&self) -> Result<Vec<Expense>> {
        self.search_expenses(&ExpenseFilter::new())
    }

    /// Fetch expenses matching a filter, most recently incurred first
    pub fn search_expenses(&self, filter: &ExpenseFilter<'_>) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let built = filter.build();

        let sql = format!(
            "SELECT {} FROM expenses e {} {}",
            EXPENSE_COLUMNS, built.where_clause, built.order_clause
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(built.params_refs().as_slice(), ExpenseRow::read)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows.into_iter().filter_map(ExpenseRow::into_expense).collect())
    }

    /// Get an expense by ID
    pub fn get_expense(&self, id: i64) -> Result<Option<Expense>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &format!("SELECT {} FROM expenses e WHERE e.id = ?", EXPENSE_COLUMNS),
                params![id],
                ExpenseRow::read,
            )
            .optional()?;

        Ok(row.and_then(ExpenseRow::into_expense))
    }

    /// Apply a partial update, returning the updated record
    ///
    /// Returns `Ok(None)` when no expense has this ID. `created_at` is never
    /// touched.
    pub fn update_expense(&self, id: i64, update: &ExpenseUpdate) -> Result<Option<Expense>> {
        update.validate()?;

        if self.get_expense(id)?.is_none() {
            return Ok(None);
        }

        if !update.is_empty() {
            let mut assignments = Vec::new();
            let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

            if let Some(title) = &update.title {
                assignments.push("title = ?");
                values.push(Box::new(title.trim().to_string()));
            }
            if let Some(category) = &update.category {
                assignments.push("category = ?");
                values.push(Box::new(category.trim().to_string()));
            }
            if let Some(amount) = update.amount {
                assignments.push("amount = ?");
                values.push(Box::new(amount));
            }
            if let Some(incurred_on) = update.incurred_on {
                assignments.push("incurred_on = ?");
                values.push(Box::new(format_timestamp(incurred_on)));
            }
            if let Some(notes) = &update.notes {
                assignments.push("notes = ?");
                values.push(Box::new(notes.clone()));
            }
            values.push(Box::new(id));

            let sql = format!(
                "UPDATE expenses SET {} WHERE id = ?",
                assignments.join(", ")
            );
            let refs: Vec<&dyn rusqlite::ToSql> = values.iter().map(|v| v.as_ref()).collect();

            let conn = self.conn()?;
            conn.execute(&sql, refs.as_slice())?;
        }

        self.get_expense(id)
    }

    /// Delete an expense, returning the record as it was before deletion
    ///
    /// Returns `Ok(None)` when no expense has this ID.
    pub fn delete_expense(&self, id: i64) -> Result<Option<Expense>> {
        let Some(existing) = self.get_expense(id)? else {
            return Ok(None);
        };

        let conn = self.conn()?;
        conn.execute("DELETE FROM expenses WHERE id = ?", params![id])?;

        Ok(Some(existing))
    }

    /// Count all stored expenses (including rows that fail to parse)
    pub fn count_expenses(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?;
        Ok(count)
    }
}
