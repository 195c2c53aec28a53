// Entity Models - domain objects persisted by the store
//
// Plain data structs with integer identities assigned by SQLite.
// MonthlyCharge is the only derived entity; everything else is
// entered by users (or the surrounding API layer) directly.

pub mod property;
pub mod meter;
pub mod reading;
pub mod tariff;
pub mod charge;
pub mod payment;

pub use property::Property;
pub use meter::{Meter, ResourceType};
pub use reading::Reading;
pub use tariff::Tariff;
pub use charge::MonthlyCharge;
pub use payment::Payment;
