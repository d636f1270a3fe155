//! Domain models for Spendcast

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: i64,
    pub title: String,
    /// Free-form classification (no fixed set of categories)
    pub category: String,
    pub amount: f64,
    /// When the expense applies, distinct from `created_at`
    pub incurred_on: DateTime<Utc>,
    pub notes: String,
    /// Set once at insertion
    pub created_at: DateTime<Utc>,
}

/// Input for creating an expense
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub title: String,
    pub category: String,
    pub amount: f64,
    pub incurred_on: DateTime<Utc>,
    /// Stored as an empty string when absent
    pub notes: Option<String>,
}

impl NewExpense {
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        amount: f64,
        incurred_on: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            amount,
            incurred_on,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Check required fields before the record reaches the store
    pub fn validate(&self) -> Result<()> {
        require_text("title", &self.title)?;
        require_text("category", &self.category)?;
        require_finite(self.amount)
    }
}

/// Partial replacement of an expense's fields
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseUpdate {
    pub title: Option<String>,
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub incurred_on: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl ExpenseUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.category.is_none()
            && self.amount.is_none()
            && self.incurred_on.is_none()
            && self.notes.is_none()
    }

    /// Validate only the fields this update carries
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        if let Some(category) = &self.category {
            require_text("category", category)?;
        }
        if let Some(amount) = self.amount {
            require_finite(amount)?;
        }
        Ok(())
    }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidData(format!("{} is required", field)));
    }
    Ok(())
}

fn require_finite(amount: f64) -> Result<()> {
    if !amount.is_finite() {
        return Err(Error::InvalidData("amount must be a finite number".to_string()));
    }
    Ok(())
}

/// Parse an incurred-on value from user input
///
/// Accepts an RFC 3339 timestamp, a `YYYY-MM-DD HH:MM:SS` UTC timestamp,
/// or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_incurred_on(input: &str) -> Result<DateTime<Utc>> {
    let s = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| Error::InvalidData(format!("Invalid date: {}", input)))
}

/// Expenses sharing one calendar day (UTC)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySpending {
    /// YYYY-MM-DD
    pub date: String,
    pub total: f64,
    pub entries: Vec<Expense>,
}

/// Category name to summed amount
pub type CategoryTotals = BTreeMap<String, f64>;

/// The slice of an expense the forecast reads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spend {
    pub incurred_on: DateTime<Utc>,
    pub amount: f64,
}

impl From<&Expense> for Spend {
    fn from(expense: &Expense) -> Self {
        Self {
            incurred_on: expense.incurred_on,
            amount: expense.amount,
        }
    }
}

/// One day of the weekday-average forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastEntry {
    /// YYYY-MM-DD, no time component
    pub date: String,
    pub predicted_expense: f64,
}
