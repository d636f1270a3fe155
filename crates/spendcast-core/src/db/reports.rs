//! Spending aggregates and the forecast snapshot

use tracing::{debug, warn};

use super::expenses::{ExpenseRow, EXPENSE_COLUMNS};
use super::{parse_timestamp, Database};
use crate::error::Result;
use crate::models::{CategoryTotals, DailySpending, Spend};

impl Database {
    /// Group expenses by the UTC calendar day they were incurred on
    ///
    /// Days are sorted ascending; entries within a day keep incurred order.
    pub fn spending_by_day(&self) -> Result<Vec<DailySpending>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses e ORDER BY e.incurred_on ASC, e.id ASC",
            EXPENSE_COLUMNS
        ))?;

        let rows = stmt
            .query_map([], ExpenseRow::read)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut days: Vec<DailySpending> = Vec::new();
        for expense in rows.into_iter().filter_map(ExpenseRow::into_expense) {
            let date = expense.incurred_on.format("%Y-%m-%d").to_string();
            match days.last_mut() {
                Some(day) if day.date == date => {
                    day.total += expense.amount;
                    day.entries.push(expense);
                }
                _ => days.push(DailySpending {
                    date,
                    total: expense.amount,
                    entries: vec![expense],
                }),
            }
        }

        Ok(days)
    }

    /// Sum amounts per category
    pub fn spending_by_category(&self) -> Result<CategoryTotals> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT category, COALESCE(SUM(amount), 0) FROM expenses GROUP BY category ORDER BY category",
        )?;

        let totals = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
            })?
            .collect::<std::result::Result<CategoryTotals, _>>()?;

        Ok(totals)
    }

    /// Snapshot of `(incurred_on, amount)` for every expense, for forecasting
    ///
    /// Rows whose `incurred_on` cannot be parsed are logged and left out.
    pub fn forecast_history(&self) -> Result<Vec<Spend>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, incurred_on, amount FROM expenses")?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let total = rows.len();
        let history: Vec<Spend> = rows
            .into_iter()
            .filter_map(|(id, incurred_on, amount)| match parse_timestamp(&incurred_on) {
                Some(ts) => Some(Spend {
                    incurred_on: ts,
                    amount,
                }),
                None => {
                    warn!(id, incurred_on = %incurred_on, "Excluding expense with malformed incurred_on from forecast");
                    None
                }
            })
            .collect();

        debug!(
            rows = total,
            used = history.len(),
            "Loaded forecast history"
        );
        Ok(history)
    }
}
