// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pawdesk status` command implementation.
//!
//! Opens the configured database and prints row counts per table together
//! with reservation totals by status and coupon pool consumption.

use pawdesk_config::PawdeskConfig;
use pawdesk_core::PawdeskError;
use pawdesk_core::types::ReservationStatus;
use pawdesk_storage::Database;
use pawdesk_storage::queries::{coupons, reservations};
use serde::Serialize;

/// Everything the status command reports, in one serializable shape.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub database_path: String,
    pub tables: Vec<TableRows>,
    pub pending: i64,
    pub confirmed: i64,
    pub finished: i64,
    pub cancelled: i64,
    pub coupons_used: i64,
    pub coupons_remaining: i64,
}

/// Row count for one table.
#[derive(Debug, Serialize)]
pub struct TableRows {
    pub table: &'static str,
    pub rows: i64,
}

/// Count for one reservation status, zero when no rows carry it.
fn count_for(counts: &[(ReservationStatus, i64)], status: ReservationStatus) -> i64 {
    counts
        .iter()
        .find(|(s, _)| *s == status)
        .map(|(_, n)| *n)
        .unwrap_or(0)
}

/// Run the `pawdesk status` command. With `--json` the report prints as
/// JSON instead of the human table.
pub async fn run_status(config: &PawdeskConfig, json: bool) -> Result<(), PawdeskError> {
    let db = Database::open(&config.storage.database_path).await?;
    let tables = db.table_counts().await?;
    let statuses = reservations::status_counts(&db).await?;
    let pool = coupons::pool_stats(&db).await?;
    db.close().await?;

    let report = StatusReport {
        database_path: config.storage.database_path.clone(),
        tables: tables
            .into_iter()
            .map(|(table, rows)| TableRows { table, rows })
            .collect(),
        pending: count_for(&statuses, ReservationStatus::Pending),
        confirmed: count_for(&statuses, ReservationStatus::Confirmed),
        finished: count_for(&statuses, ReservationStatus::Finished),
        cancelled: count_for(&statuses, ReservationStatus::Cancelled),
        coupons_used: pool.used,
        coupons_remaining: pool.remaining,
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &StatusReport) {
    println!();
    println!("  pawdesk status");
    println!("  {}", "-".repeat(35));
    println!("    Database: {}", report.database_path);
    println!();
    for table in &report.tables {
        println!("    {:<20} {}", table.table, table.rows);
    }
    println!();
    println!(
        "    Reservations: {} pending, {} confirmed, {} finished, {} cancelled",
        report.pending, report.confirmed, report.finished, report.cancelled
    );
    println!(
        "    Coupons:      {} used, {} remaining",
        report.coupons_used, report.coupons_remaining
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_for_defaults_missing_statuses_to_zero() {
        let counts = vec![
            (ReservationStatus::Pending, 3),
            (ReservationStatus::Finished, 1),
        ];
        assert_eq!(count_for(&counts, ReservationStatus::Pending), 3);
        assert_eq!(count_for(&counts, ReservationStatus::Finished), 1);
        assert_eq!(count_for(&counts, ReservationStatus::Confirmed), 0);
        assert_eq!(count_for(&counts, ReservationStatus::Cancelled), 0);
    }

    #[test]
    fn status_report_serializes() {
        let report = StatusReport {
            database_path: "pawdesk.db".to_string(),
            tables: vec![TableRows {
                table: "stores",
                rows: 2,
            }],
            pending: 1,
            confirmed: 0,
            finished: 4,
            cancelled: 0,
            coupons_used: 1,
            coupons_remaining: 83,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"pending\":1"));
        assert!(json.contains("\"coupons_remaining\":83"));
        assert!(json.contains("\"table\":\"stores\""));
    }
}
