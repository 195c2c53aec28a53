// Tariff Entity - a per-unit price valid over a date interval

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ResourceType;

/// Price per unit for one resource type, valid over
/// `[valid_from, valid_to]`. `valid_to = None` means open-ended.
///
/// Intervals for the same resource type should not overlap, but the
/// resolver stays deterministic if they do: the candidate with the
/// latest `valid_from` wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tariff {
    pub id: i64,
    pub resource_type: ResourceType,
    pub value_per_unit: f64,
    pub valid_from: NaiveDate,
    pub valid_to: Option<NaiveDate>,
}

impl Tariff {
    /// Whether this tariff is in effect on `date`.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.valid_from <= date && self.valid_to.map_or(true, |until| until >= date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tariff(from: (i32, u32, u32), to: Option<(i32, u32, u32)>) -> Tariff {
        Tariff {
            id: 1,
            resource_type: ResourceType::Gas,
            value_per_unit: 7.5,
            valid_from: NaiveDate::from_ymd_opt(from.0, from.1, from.2).unwrap(),
            valid_to: to.map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap()),
        }
    }

    #[test]
    fn test_open_ended_covers_far_future() {
        let t = tariff((2023, 1, 1), None);
        assert!(t.covers(NaiveDate::from_ymd_opt(2099, 12, 31).unwrap()));
        assert!(!t.covers(NaiveDate::from_ymd_opt(2022, 12, 31).unwrap()));
    }

    #[test]
    fn test_bounded_interval_is_inclusive() {
        let t = tariff((2023, 1, 1), Some((2023, 6, 30)));
        assert!(t.covers(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()));
        assert!(t.covers(NaiveDate::from_ymd_opt(2023, 6, 30).unwrap()));
        assert!(!t.covers(NaiveDate::from_ymd_opt(2023, 7, 1).unwrap()));
    }
}
