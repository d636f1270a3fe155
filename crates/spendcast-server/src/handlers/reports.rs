//! Aggregate and forecast handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{AppError, AppState, API_ACTOR};
use spendcast_core::models::{parse_incurred_on, CategoryTotals, DailySpending, ForecastEntry};

/// GET /api/expenses/by-date - Expenses grouped by calendar day
pub async fn expenses_by_date(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DailySpending>>, AppError> {
    let days = state.db.spending_by_day()?;

    state.db.log_audit(
        API_ACTOR,
        "report",
        Some("by_date"),
        None,
        Some(&format!("days={}", days.len())),
    )?;

    Ok(Json(days))
}

/// GET /api/expenses/categories - Total spent per category
pub async fn category_totals(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CategoryTotals>, AppError> {
    let totals = state.db.spending_by_category()?;

    state.db.log_audit(
        API_ACTOR,
        "report",
        Some("categories"),
        None,
        Some(&format!("categories={}", totals.len())),
    )?;

    Ok(Json(totals))
}

#[derive(Debug, Default, Deserialize)]
pub struct ForecastQuery {
    /// Reference instant (RFC 3339 or YYYY-MM-DD), defaults to the current time
    pub now: Option<String>,
}

#[derive(Serialize)]
pub struct ForecastResponse {
    pub forecast: Vec<ForecastEntry>,
}

/// GET /api/expenses/forecast - Weekday-average projection for the next 7 days
pub async fn expense_forecast(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ForecastQuery>,
) -> Result<Json<ForecastResponse>, AppError> {
    let now = match params.now.as_deref() {
        Some(s) => parse_incurred_on(s).map_err(|e| AppError::bad_request(&e.to_string()))?,
        None => Utc::now(),
    };

    let history = state.db.forecast_history()?;
    let forecast = spendcast_core::forecast(&history, now);
    debug!(history = history.len(), now = %now, "Computed forecast");

    state.db.log_audit(
        API_ACTOR,
        "report",
        Some("forecast"),
        None,
        Some(&format!("history={}", history.len())),
    )?;

    Ok(Json(ForecastResponse { forecast }))
}
