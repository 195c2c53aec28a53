// Property Entity - a billable unit of real estate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A property owned by exactly one user. Deleting a property cascades
/// to its meters, readings, payments and charge buckets at the schema
/// level; the core never deletes anything itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: i64,
    /// Owner's user id. Ownership checks happen at the API boundary;
    /// the core trusts that inputs already belong to the caller.
    pub owner_id: i64,
    pub name: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}
