// MonthlyCharge Entity - derived accumulator of consumption and cost
//
// One row per (property, year, month, resource_type). Created lazily by
// the first accrual for that key, then updated additively. The core
// never deletes charge rows; the only way to rebuild them is the
// explicit replay in the accrual module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ResourceType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyCharge {
    pub id: i64,
    pub property_id: i64,
    pub year: i32,
    pub month: u32,
    pub resource_type: ResourceType,
    /// Sum of usage deltas posted to this bucket.
    pub consumption: f64,
    /// Sum of delta × tariff price for each posted delta. Tariffs are
    /// resolved per reading date, so a month spanning a price change
    /// can mix rates inside one bucket.
    pub amount: f64,
    pub generated_at: DateTime<Utc>,
}

impl MonthlyCharge {
    /// Month key in "YYYY-MM" form, the grouping key used by analytics.
    pub fn month_key(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_key_zero_pads() {
        let charge = MonthlyCharge {
            id: 1,
            property_id: 1,
            year: 2024,
            month: 3,
            resource_type: ResourceType::Electricity,
            consumption: 0.0,
            amount: 0.0,
            generated_at: Utc::now(),
        };
        assert_eq!(charge.month_key(), "2024-03");
    }
}
