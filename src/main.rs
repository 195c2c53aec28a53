// Maintenance CLI for the utility billing store
//
// The API layer talks to the library directly; this binary covers the
// operational chores: schema setup, bulk reading import, reports and
// charge rebuilds.

use anyhow::{bail, Result};
use chrono::Utc;
use rusqlite::Connection;
use std::env;
use std::path::Path;

use utility_billing::{
    analyze, forecast_spend, import_readings, load_readings_csv, rebuild_property_charges,
    setup_database, Period, DEFAULT_FORECAST_MONTHS,
};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        print_usage();
        std::process::exit(1);
    }

    let command = args[1].as_str();
    let db_path = Path::new(&args[2]);

    match command {
        "init" => run_init(db_path),
        "import" => {
            if args.len() < 4 {
                bail!("usage: utility-billing import <db> <readings.csv>");
            }
            run_import(db_path, Path::new(&args[3]))
        }
        "report" => {
            if args.len() < 4 {
                bail!("usage: utility-billing report <db> <property_id> [sy sm ey em]");
            }
            let property_id: i64 = args[3].parse()?;
            let period = parse_period(&args[4..])?;
            run_report(db_path, property_id, period)
        }
        "forecast" => {
            if args.len() < 4 {
                bail!("usage: utility-billing forecast <db> <property_id>");
            }
            run_forecast(db_path, args[3].parse()?)
        }
        "rebuild" => {
            if args.len() < 4 {
                bail!("usage: utility-billing rebuild <db> <property_id>");
            }
            run_rebuild(db_path, args[3].parse()?)
        }
        other => {
            eprintln!("unknown command: {}", other);
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("utility-billing {}", utility_billing::VERSION);
    eprintln!("usage:");
    eprintln!("  utility-billing init     <db>");
    eprintln!("  utility-billing import   <db> <readings.csv>");
    eprintln!("  utility-billing report   <db> <property_id> [sy sm ey em]");
    eprintln!("  utility-billing forecast <db> <property_id>");
    eprintln!("  utility-billing rebuild  <db> <property_id>");
}

fn parse_period(args: &[String]) -> Result<Option<Period>> {
    if args.is_empty() {
        return Ok(None);
    }
    if args.len() != 4 {
        bail!("period takes exactly four values: start_year start_month end_year end_month");
    }
    Ok(Some(Period::new(
        args[0].parse()?,
        args[1].parse()?,
        args[2].parse()?,
        args[3].parse()?,
    )))
}

fn run_init(db_path: &Path) -> Result<()> {
    let conn = Connection::open(db_path)?;
    setup_database(&conn)?;
    println!("initialized schema at {}", db_path.display());
    Ok(())
}

fn run_import(db_path: &Path, csv_path: &Path) -> Result<()> {
    let mut conn = Connection::open(db_path)?;
    setup_database(&conn)?;

    let rows = load_readings_csv(csv_path)?;
    println!("loaded {} readings from {}", rows.len(), csv_path.display());

    let imported = import_readings(&mut conn, &rows)?;
    println!("recorded and accrued {} readings", imported);

    Ok(())
}

fn run_report(db_path: &Path, property_id: i64, period: Option<Period>) -> Result<()> {
    let conn = Connection::open(db_path)?;
    let today = Utc::now().date_naive();
    let period = period.unwrap_or_else(|| Period::default_window(today));

    let report = analyze(&conn, property_id, period, today)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn run_forecast(db_path: &Path, property_id: i64) -> Result<()> {
    let conn = Connection::open(db_path)?;
    let today = Utc::now().date_naive();

    let forecast = forecast_spend(&conn, property_id, DEFAULT_FORECAST_MONTHS, today)?;
    println!("{:.2}", forecast);

    Ok(())
}

fn run_rebuild(db_path: &Path, property_id: i64) -> Result<()> {
    let mut conn = Connection::open(db_path)?;

    let replayed = rebuild_property_charges(&mut conn, property_id)?;
    println!("replayed {} readings for property {}", replayed, property_id);

    Ok(())
}
