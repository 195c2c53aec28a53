// Reading Entity - one cumulative register value from a meter

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A meter reading. `value` is the cumulative register as shown on the
/// meter, not a per-period delta; deltas are derived by the accrual
/// engine against the previous reading.
///
/// Several readings may share a `reading_date`. Ordering among them is
/// by creation: the most recently created one wins as "latest". That
/// tie-break is deliberate and must not be changed to max-by-value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reading {
    pub id: i64,
    pub meter_id: i64,
    pub value: f64,
    pub reading_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}
