//! CSV import and export of expenses
//!
//! Columns: `title,category,amount,incurred_on,notes`. On import `notes` may
//! be omitted and `incurred_on` accepts anything [`parse_incurred_on`] does.
//! Rows that fail to parse or validate are skipped and reported, never fatal.

use std::io::{Read, Write};

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};
use crate::models::{parse_incurred_on, Expense, NewExpense};

#[derive(Debug, Deserialize)]
struct ImportRecord {
    title: String,
    category: String,
    amount: f64,
    incurred_on: String,
    #[serde(default)]
    notes: Option<String>,
}

#[derive(Debug, Serialize)]
struct ExportRecord<'a> {
    title: &'a str,
    category: &'a str,
    amount: f64,
    incurred_on: String,
    notes: &'a str,
}

/// A CSV row that was not imported
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based line number; the header is line 1
    pub line: u64,
    pub reason: String,
}

/// Outcome of parsing an expense CSV
#[derive(Debug, Default)]
pub struct CsvImport {
    pub expenses: Vec<NewExpense>,
    pub skipped: Vec<SkippedRow>,
}

/// Parse expenses from CSV with a header row
pub fn parse_csv<R: Read>(reader: R) -> Result<CsvImport> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut import = CsvImport::default();

    for (idx, record) in rdr.deserialize::<ImportRecord>().enumerate() {
        let line = record_line(idx);

        let parsed = match record {
            Ok(record) => to_new_expense(record),
            Err(e) if e.is_io_error() => return Err(Error::Csv(e)),
            Err(e) => Err(Error::InvalidData(e.to_string())),
        };

        match parsed {
            Ok(expense) => import.expenses.push(expense),
            Err(e) => {
                warn!(line, error = %e, "Skipping CSV row");
                import.skipped.push(SkippedRow {
                    line,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(import)
}

fn record_line(idx: usize) -> u64 {
    idx as u64 + 2
}

fn to_new_expense(record: ImportRecord) -> Result<NewExpense> {
    let incurred_on = parse_incurred_on(&record.incurred_on)?;
    let expense = NewExpense {
        title: record.title,
        category: record.category,
        amount: record.amount,
        incurred_on,
        notes: record.notes.filter(|n| !n.is_empty()),
    };
    expense.validate()?;
    Ok(expense)
}

/// Write expenses as CSV with a header row
pub fn write_csv<W: Write>(writer: W, expenses: &[Expense]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    for expense in expenses {
        wtr.serialize(ExportRecord {
            title: &expense.title,
            category: &expense.category,
            amount: expense.amount,
            incurred_on: expense
                .incurred_on
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            notes: &expense.notes,
        })?;
    }

    wtr.flush()?;
    Ok(())
}
