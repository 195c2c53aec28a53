// Forecast Estimator - predicts near-term spend from recent history
//
// The forecast is the arithmetic mean of the total charge amount over
// the most recent completed months. The current calendar month is
// always excluded: it is still accumulating and would drag the average
// toward whatever fraction of the month has been read so far.

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use rusqlite::Connection;

use crate::store;

/// Default lookback window, in months.
pub const DEFAULT_FORECAST_MONTHS: usize = 3;

/// Average monthly spend over up to `months` most recent completed
/// months, relative to `today`. Returns 0.0 when no history exists;
/// an empty property never makes this fail.
pub fn forecast_spend(
    conn: &Connection,
    property_id: i64,
    months: usize,
    today: NaiveDate,
) -> Result<f64> {
    if months == 0 {
        return Ok(0.0);
    }

    let totals =
        store::recent_month_totals(conn, property_id, today.year(), today.month(), months)?;
    if totals.is_empty() {
        return Ok(0.0);
    }

    Ok(totals.iter().sum::<f64>() / totals.len() as f64)
}

// ============================================================================
// TESTS
// ============================================================================
