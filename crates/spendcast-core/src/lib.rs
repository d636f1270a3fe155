//! Spendcast Core Library
//!
//! Shared functionality for the Spendcast expense tracker:
//! - Expense models and input validation
//! - Record store on SQLite with connection pooling and migrations
//! - Aggregates (spending by day, spending by category)
//! - Weekday-average expense forecast
//! - CSV import and export

pub mod csv_io;
pub mod db;
pub mod error;
pub mod forecast;
pub mod models;

pub use csv_io::{parse_csv, write_csv, CsvImport, SkippedRow};
pub use db::{AuditEntry, Database, ExpenseFilter};
pub use error::{Error, Result};
pub use forecast::{forecast, weekday_averages, weekday_index, FORECAST_DAYS};
pub use models::{
    CategoryTotals, DailySpending, Expense, ExpenseUpdate, ForecastEntry, NewExpense, Spend,
};
