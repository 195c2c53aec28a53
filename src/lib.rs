// Utility Billing Core - Library
// Exposes the billing engines for use by the API layer, CLI and tests

pub mod store;
pub mod entities;
pub mod accrual;
pub mod forecast;
pub mod analytics;
pub mod importer;

// Re-export commonly used types
pub use entities::{Meter, MonthlyCharge, Payment, Property, Reading, ResourceType, Tariff};
pub use store::{
    setup_database,
    insert_property, get_property, delete_property,
    insert_meter, get_meter,
    insert_tariff, find_tariff,
    get_previous_reading, readings_for_property,
    get_charge, get_or_create_charge, save_charge, charges_in_range, count_charges,
    insert_payment, sum_payments_by_month, PaymentTotal,
};
pub use accrual::{record_reading, rebuild_property_charges};
pub use forecast::{forecast_spend, DEFAULT_FORECAST_MONTHS};
pub use analytics::{analyze, AnalyticsReport, ChargeLine, MonthlyBreakdown, Period};
pub use importer::{import_readings, load_readings_csv, parse_readings_csv, ReadingRow};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
