// Meter Entity - a physical meter installed at a property
//
// The resource type is fixed at creation: a meter that counts
// electricity never becomes a gas meter. Replacing hardware means
// creating a new Meter row.

use anyhow::{anyhow, Error};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// RESOURCE TYPE
// ============================================================================

/// The kind of utility a meter (or tariff, or charge bucket) refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Electricity,
    ColdWater,
    HotWater,
    Gas,
    Heating,
}

impl ResourceType {
    /// Stable string form, used as the TEXT value in SQLite.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Electricity => "electricity",
            ResourceType::ColdWater => "cold_water",
            ResourceType::HotWater => "hot_water",
            ResourceType::Gas => "gas",
            ResourceType::Heating => "heating",
        }
    }

}

impl FromStr for ResourceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "electricity" => Ok(ResourceType::Electricity),
            "cold_water" => Ok(ResourceType::ColdWater),
            "hot_water" => Ok(ResourceType::HotWater),
            "gas" => Ok(ResourceType::Gas),
            "heating" => Ok(ResourceType::Heating),
            other => Err(anyhow!("unknown resource type: {}", other)),
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// METER ENTITY
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meter {
    pub id: i64,
    pub property_id: i64,
    pub resource_type: ResourceType,
    /// Unit label for display ("kWh", "m³", "Gcal"); informational only,
    /// accrual math never converts units.
    pub unit: String,
    pub serial_number: String,
    pub installed_at: NaiveDate,
    pub is_active: bool,
}
