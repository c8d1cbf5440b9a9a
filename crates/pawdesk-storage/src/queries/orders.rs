// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order rows written at completion, and the staff risk view.

use pawdesk_core::PawdeskError;
use pawdesk_core::types::ReservationId;
use rusqlite::params;

use crate::database::Database;
use crate::models::{Order, RiskReservation};
use crate::queries::reservations::{RESERVATION_COLUMNS, map_reservation_row};

/// Insert the order for a completed reservation. Returns the order ID.
/// The UNIQUE constraint on `reservation_id` keeps this to one per
/// reservation for all time.
pub(crate) fn insert_tx(
    conn: &rusqlite::Connection,
    reservation_id: &ReservationId,
    user_id: &str,
    total_price: i64,
) -> Result<i64, rusqlite::Error> {
    conn.execute(
        "INSERT INTO orders (reservation_id, user_id, total_price) VALUES (?1, ?2, ?3)",
        params![reservation_id.as_str(), user_id, total_price],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Get an order by ID.
pub async fn get(db: &Database, order_id: i64) -> Result<Option<Order>, PawdeskError> {
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT id, reservation_id, user_id, total_price, status, blacklist, created_at
                 FROM orders WHERE id = ?1",
                params![order_id],
                map_order_row,
            );
            match result {
                Ok(order) => Ok(Some(order)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get the order written for a reservation, if it was ever completed.
pub async fn find_for_reservation(
    db: &Database,
    reservation_id: &ReservationId,
) -> Result<Option<Order>, PawdeskError> {
    let reservation_id = reservation_id.clone();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT id, reservation_id, user_id, total_price, status, blacklist, created_at
                 FROM orders WHERE reservation_id = ?1",
                params![reservation_id.as_str()],
                map_order_row,
            );
            match result {
                Ok(order) => Ok(Some(order)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

fn map_order_row(row: &rusqlite::Row<'_>) -> Result<Order, rusqlite::Error> {
    Ok(Order {
        order_id: row.get(0)?,
        reservation_id: row.get(1)?,
        user_id: row.get(2)?,
        total_price: row.get(3)?,
        status: row.get(4)?,
        blacklist: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Flip the customer risk flag on an order.
pub async fn set_blacklist(db: &Database, order_id: i64, flag: bool) -> Result<(), PawdeskError> {
    let touched = db
        .connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE orders SET blacklist = ?1 WHERE id = ?2",
                params![flag, order_id],
            )?;
            Ok(n)
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    if touched == 0 {
        return Err(PawdeskError::not_found("order", format!("order_id={order_id}")));
    }
    Ok(())
}

/// Completed reservations at a store joined with their orders, newest
/// completion first. Orders only exist for finished reservations, so no
/// status filter is needed.
pub async fn risk_list(
    db: &Database,
    store_name: &str,
    limit: i64,
) -> Result<Vec<RiskReservation>, PawdeskError> {
    let store_name = store_name.to_string();
    let res_cols: String = RESERVATION_COLUMNS
        .split(',')
        .map(|c| format!("r.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "SELECT {res_cols}, o.id, o.blacklist
         FROM orders o
         JOIN reservations r ON r.reservation_id = o.reservation_id
         WHERE r.store_name = ?1
         ORDER BY o.created_at DESC, o.id DESC
         LIMIT ?2"
    );
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![store_name, limit], |row| {
                Ok(RiskReservation {
                    reservation: map_reservation_row(row)?,
                    order_id: row.get(22)?,
                    blacklist: row.get(23)?,
                })
            })?;
            let mut list = Vec::new();
            for row in rows {
                list.push(row?);
            }
            Ok(list)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
