// Analytics Aggregator - per-month view of charges, payments, forecast
//
// Read-only over the buckets the accrual engine maintains. Charges are
// grouped by month into line items plus month totals; payment totals
// ride along as an independent series (never reconciled line-by-line
// against the charges); the spend forecast is attached with the
// default lookback.

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;

use crate::entities::ResourceType;
use crate::forecast::{forecast_spend, DEFAULT_FORECAST_MONTHS};
use crate::store::{self, PaymentTotal};

// ============================================================================
// REPORT TYPES
// ============================================================================

/// Inclusive (year, month) range, compared as a lexicographic pair.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Period {
    pub start_year: i32,
    pub start_month: u32,
    pub end_year: i32,
    pub end_month: u32,
}

impl Period {
    pub fn new(start_year: i32, start_month: u32, end_year: i32, end_month: u32) -> Self {
        Period { start_year, start_month, end_year, end_month }
    }

    /// The default reporting window: January of last year through
    /// December of the current year.
    pub fn default_window(today: NaiveDate) -> Self {
        use chrono::Datelike;
        Period::new(today.year() - 1, 1, today.year(), 12)
    }
}

/// One resource's contribution to a month.
#[derive(Debug, Clone, Serialize)]
pub struct ChargeLine {
    pub resource_type: ResourceType,
    pub consumption: f64,
    pub amount: f64,
}

/// All charges of one month, keyed "YYYY-MM", with totals summed
/// across resource types.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyBreakdown {
    pub month: String,
    pub items: Vec<ChargeLine>,
    pub total_amount: f64,
    pub total_consumption: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub period: Period,
    /// Chronologically ordered; empty when the property has no charges
    /// in range (that is a valid report, not an error).
    pub monthly: Vec<MonthlyBreakdown>,
    pub payments: Vec<PaymentTotal>,
    pub forecast_amount: f64,
}

// ============================================================================
// AGGREGATION
// ============================================================================

/// Build the analytics report for a property over `period`. `today`
/// anchors the forecast's current-month exclusion.
pub fn analyze(
    conn: &Connection,
    property_id: i64,
    period: Period,
    today: NaiveDate,
) -> Result<AnalyticsReport> {
    let charges = store::charges_in_range(
        conn,
        property_id,
        period.start_year,
        period.start_month,
        period.end_year,
        period.end_month,
    )?;

    // Rows arrive ordered by (year, month), so one pass groups them
    let mut monthly: Vec<MonthlyBreakdown> = Vec::new();
    for charge in charges {
        let key = charge.month_key();
        if monthly.last().map(|m| m.month.as_str()) != Some(key.as_str()) {
            monthly.push(MonthlyBreakdown {
                month: key,
                items: Vec::new(),
                total_amount: 0.0,
                total_consumption: 0.0,
            });
        }

        // A group for this key always exists after the guarded push
        let Some(entry) = monthly.last_mut() else {
            unreachable!()
        };
        entry.total_amount += charge.amount;
        entry.total_consumption += charge.consumption;
        entry.items.push(ChargeLine {
            resource_type: charge.resource_type,
            consumption: charge.consumption,
            amount: charge.amount,
        });
    }

    let payments = store::sum_payments_by_month(conn, property_id)?;
    let forecast_amount = forecast_spend(conn, property_id, DEFAULT_FORECAST_MONTHS, today)?;

    Ok(AnalyticsReport { period, monthly, payments, forecast_amount })
}

// ============================================================================
// TESTS
// ============================================================================
