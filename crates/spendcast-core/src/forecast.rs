//! Weekday-average expense forecast
//!
//! Buckets historical expenses by day of week, averages each bucket, and
//! projects the next [`FORECAST_DAYS`] days by looking up the average for
//! each future date's weekday. Weekday index 0 is Sunday, 6 is Saturday,
//! computed in UTC for both history and projection.
//!
//! The computation is pure: `now` is a parameter and the history is only
//! borrowed.

use chrono::{DateTime, Datelike, Duration, Utc};

use crate::models::{ForecastEntry, Spend};

/// Number of days in a forecast, starting at offset 0 ("today")
pub const FORECAST_DAYS: usize = 7;

/// Day-of-week index for a timestamp: 0 = Sunday .. 6 = Saturday (UTC)
pub fn weekday_index(ts: DateTime<Utc>) -> usize {
    ts.weekday().num_days_from_sunday() as usize
}

/// Average amount per weekday bucket, indexed by [`weekday_index`]
///
/// Empty buckets average to 0.
pub fn weekday_averages(history: &[Spend]) -> [f64; 7] {
    let mut totals = [0.0_f64; 7];
    let mut counts = [0_u32; 7];

    for spend in history {
        let day = weekday_index(spend.incurred_on);
        totals[day] += spend.amount;
        counts[day] += 1;
    }

    let mut averages = [0.0_f64; 7];
    for day in 0..7 {
        if counts[day] > 0 {
            averages[day] = totals[day] / counts[day] as f64;
        }
    }
    averages
}

/// Forecast the next seven days of spending from `now`
///
/// Entry `i` is dated `now + i * 24h`. Always returns exactly
/// [`FORECAST_DAYS`] entries in ascending date order. Dates past the last
/// representable instant saturate at [`DateTime::<Utc>::MAX_UTC`].
pub fn forecast(history: &[Spend], now: DateTime<Utc>) -> Vec<ForecastEntry> {
    let averages = weekday_averages(history);

    (0..FORECAST_DAYS)
        .map(|offset| {
            let date = now
                .checked_add_signed(Duration::days(offset as i64))
                .unwrap_or(DateTime::<Utc>::MAX_UTC);
            ForecastEntry {
                date: date.format("%Y-%m-%d").to_string(),
                predicted_expense: averages[weekday_index(date)],
            }
        })
        .collect()
}
