//! Expense CRUD handlers

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{AppError, AppState, MessageResponse, API_ACTOR};
use spendcast_core::models::{parse_incurred_on, Expense, ExpenseUpdate, NewExpense};
use spendcast_core::ExpenseFilter;

/// Request body for creating an expense
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseRequest {
    pub title: String,
    pub category: String,
    pub amount: f64,
    /// RFC 3339 timestamp or YYYY-MM-DD
    pub incurred_on: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request body for updating an expense (every field optional)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpenseRequest {
    pub title: Option<String>,
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub incurred_on: Option<String>,
    pub notes: Option<String>,
}

/// Query parameters for listing expenses
#[derive(Debug, Default, Deserialize)]
pub struct ListExpensesQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    /// Inclusive start date (YYYY-MM-DD)
    pub from: Option<String>,
    /// Inclusive end date (YYYY-MM-DD)
    pub to: Option<String>,
}

fn parse_body<T: serde::de::DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::bad_request(&format!("Invalid request body: {}", e)))
}

fn parse_query_date(value: Option<&str>, name: &str) -> Result<Option<NaiveDate>, AppError> {
    value
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .map_err(|_| AppError::bad_request(&format!("Invalid {} date format (use YYYY-MM-DD)", name)))
}

/// POST /api/expenses - Create an expense
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Expense>), AppError> {
    let req: CreateExpenseRequest = parse_body(&body)?;

    let incurred_on =
        parse_incurred_on(&req.incurred_on).map_err(|e| AppError::bad_request(&e.to_string()))?;

    let new_expense = NewExpense {
        title: req.title,
        category: req.category,
        amount: req.amount,
        incurred_on,
        notes: req.notes,
    };

    let expense = state
        .db
        .insert_expense(&new_expense)
        .map_err(AppError::from_core)?;

    state.db.log_audit(
        API_ACTOR,
        "create",
        Some("expense"),
        Some(expense.id),
        Some(&format!(
            "title={}, category={}, amount={}",
            expense.title, expense.category, expense.amount
        )),
    )?;

    Ok((StatusCode::CREATED, Json(expense)))
}

/// GET /api/expenses - List expenses, optionally filtered
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListExpensesQuery>,
) -> Result<Json<Vec<Expense>>, AppError> {
    let from = parse_query_date(params.from.as_deref(), "from")?;
    let to = parse_query_date(params.to.as_deref(), "to")?;

    let filter = ExpenseFilter::new()
        .category(params.category.as_deref())
        .search(params.search.as_deref())
        .from(from)
        .to(to);

    let expenses = if filter.is_empty() {
        state.db.list_expenses()?
    } else {
        state.db.search_expenses(&filter)?
    };

    state.db.log_audit(
        API_ACTOR,
        "list",
        Some("expense"),
        None,
        Some(&format!("count={}", expenses.len())),
    )?;

    Ok(Json(expenses))
}

/// GET /api/expenses/:id - Get a single expense
pub async fn get_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Expense>, AppError> {
    let expense = state
        .db
        .get_expense(id)?
        .ok_or_else(|| AppError::not_found("Expense not found"))?;

    state
        .db
        .log_audit(API_ACTOR, "get", Some("expense"), Some(id), None)?;

    Ok(Json(expense))
}

/// PUT /api/expenses/:id - Replace some or all fields of an expense
pub async fn update_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<Json<Expense>, AppError> {
    let req: UpdateExpenseRequest = parse_body(&body)?;

    let incurred_on = req
        .incurred_on
        .as_deref()
        .map(parse_incurred_on)
        .transpose()
        .map_err(|e| AppError::bad_request(&e.to_string()))?;

    let update = ExpenseUpdate {
        title: req.title,
        category: req.category,
        amount: req.amount,
        incurred_on,
        notes: req.notes,
    };

    let expense = state
        .db
        .update_expense(id, &update)
        .map_err(AppError::from_core)?
        .ok_or_else(|| AppError::not_found("Expense not found"))?;

    state.db.log_audit(
        API_ACTOR,
        "update",
        Some("expense"),
        Some(id),
        Some(&format!(
            "title={}, category={}, amount={}",
            expense.title, expense.category, expense.amount
        )),
    )?;

    Ok(Json(expense))
}

/// DELETE /api/expenses/:id - Delete an expense
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    let deleted = state
        .db
        .delete_expense(id)?
        .ok_or_else(|| AppError::not_found("Expense not found"))?;

    state.db.log_audit(
        API_ACTOR,
        "delete",
        Some("expense"),
        Some(id),
        Some(&format!("title={}", deleted.title)),
    )?;

    Ok(Json(MessageResponse {
        message: "Expense deleted successfully".to_string(),
    }))
}
