//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `closet_core` linkage.
//! - Inspect a closet database without the Flutter shell.
//!
//! Usage:
//! - `closet_cli` prints ping and version.
//! - `closet_cli summary <db>` prints closet totals.
//! - `closet_cli export <db>` prints the export JSON to stdout.

use chrono::Utc;
use closet_core::db::open_db;
use closet_core::{ClosetService, SqliteKvRepository};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let result = match args.as_slice() {
        [] => {
            println!("closet_core ping={}", closet_core::ping());
            println!("closet_core version={}", closet_core::core_version());
            Ok(())
        }
        [command, db_path] if command == "summary" => print_summary(db_path),
        [command, db_path] if command == "export" => print_export(db_path),
        _ => Err("usage: closet_cli [summary <db> | export <db>]".to_string()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn print_summary(db_path: &str) -> Result<(), String> {
    with_service(db_path, |service| {
        let summary = service.summary();
        println!("items={}", summary.total_items);
        println!("total_value={:.2}", summary.total_value);
        println!("total_wears={}", summary.total_wears);
        println!("average_cost_per_wear={:.2}", summary.average_cost_per_wear);
        for entry in service.category_breakdown() {
            println!(
                "category={} count={} wears={} value={:.2}",
                entry.category, entry.count, entry.total_wears, entry.total_value
            );
        }
        Ok(())
    })
}

fn print_export(db_path: &str) -> Result<(), String> {
    with_service(db_path, |service| {
        let json = service
            .export_json(Utc::now())
            .map_err(|err| err.to_string())?;
        println!("{json}");
        Ok(())
    })
}

fn with_service(
    db_path: &str,
    f: impl FnOnce(&ClosetService<SqliteKvRepository<'_>>) -> Result<(), String>,
) -> Result<(), String> {
    let mut conn = open_db(db_path).map_err(|err| format!("failed to open `{db_path}`: {err}"))?;
    let repo = SqliteKvRepository::try_new(&mut conn).map_err(|err| err.to_string())?;
    f(&ClosetService::open(repo))
}
