// Payment Entity - money recorded against a property and month

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A payment made for a property, attributed to a (year, month).
/// Payments are reporting data only: analytics sums them per month
/// alongside charge totals but never reconciles the two.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub property_id: i64,
    pub year: i32,
    pub month: u32,
    pub amount: f64,
    pub paid_at: NaiveDate,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}
