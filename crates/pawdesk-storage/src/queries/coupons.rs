// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Coupon issuance, attachment, and finalization.
//!
//! Each customer holds at most one coupon from a fixed promotional pool.
//! Attachment happens inside the grooming-creation transaction and never
//! fails the booking; finalization happens inside the complete transaction
//! and is a no-op when the coupon is already spent.

use std::str::FromStr;

use pawdesk_core::PawdeskError;
use pawdesk_core::types::{COUPON_POOL_SIZE, Coupon, CouponStatus, ReservationId};
use rusqlite::params;

use crate::database::Database;
use crate::models::{CouponOutcome, CouponPoolStats};

/// Issue a coupon to a customer. Re-issuing to the same customer keeps the
/// original coupon untouched.
pub async fn issue(
    db: &Database,
    coupon_number: &str,
    user_id: &str,
) -> Result<(), PawdeskError> {
    let coupon_number = coupon_number.to_string();
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO coupons (coupon_number, user_id) VALUES (?1, ?2)
                 ON CONFLICT (user_id) DO NOTHING",
                params![coupon_number, user_id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a customer's coupon, if they were ever issued one.
pub async fn find_for_user(db: &Database, user_id: &str) -> Result<Option<Coupon>, PawdeskError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT coupon_number, user_id, status, reservation_id, order_id, store_name
                 FROM coupons WHERE user_id = ?1",
                params![user_id],
                map_coupon_row,
            );
            match result {
                Ok(coupon) => Ok(Some(coupon)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

fn map_coupon_row(row: &rusqlite::Row<'_>) -> Result<Coupon, rusqlite::Error> {
    let status_raw: String = row.get(2)?;
    let status = CouponStatus::from_str(&status_raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Coupon {
        coupon_number: row.get(0)?,
        user_id: row.get(1)?,
        status,
        reservation_id: row.get(3)?,
        order_id: row.get(4)?,
        store_name: row.get(5)?,
    })
}

/// Point the customer's unspent coupon at a reservation. Reports what
/// happened instead of failing; a missing or spent coupon never blocks
/// the booking it rides along with.
pub(crate) fn attach(
    conn: &rusqlite::Connection,
    user_id: &str,
    reservation_id: &ReservationId,
    store_name: &str,
) -> Result<CouponOutcome, rusqlite::Error> {
    let result = conn.query_row(
        "SELECT coupon_number, status FROM coupons WHERE user_id = ?1",
        params![user_id],
        |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
    );
    let (coupon_number, status) = match result {
        Ok(pair) => pair,
        Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(CouponOutcome::NoCoupon),
        Err(e) => return Err(e),
    };
    if status == CouponStatus::Used.to_string() {
        return Ok(CouponOutcome::AlreadyUsed);
    }

    conn.execute(
        "UPDATE coupons SET reservation_id = ?1, store_name = ?2 WHERE user_id = ?3",
        params![reservation_id.as_str(), store_name, user_id],
    )?;
    Ok(CouponOutcome::Attached { coupon_number })
}

/// Consume the coupon attached to a reservation and stamp the order that
/// paid for it. Idempotent: an already-used coupon is left alone.
pub(crate) fn finalize(
    conn: &rusqlite::Connection,
    reservation_id: &ReservationId,
    order_id: i64,
) -> Result<(), rusqlite::Error> {
    conn.execute(
        "UPDATE coupons SET status = 'used', order_id = ?1
         WHERE reservation_id = ?2 AND status = 'not_used'",
        params![order_id, reservation_id.as_str()],
    )?;
    Ok(())
}

/// Pool consumption: coupons spent so far and what remains of the fixed
/// promotional pool.
pub async fn pool_stats(db: &Database) -> Result<CouponPoolStats, PawdeskError> {
    let used = db
        .connection()
        .call(|conn| {
            let n: i64 = conn.query_row(
                "SELECT COUNT(*) FROM coupons WHERE status = 'used'",
                [],
                |row| row.get(0),
            )?;
            Ok(n)
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    Ok(CouponPoolStats {
        used,
        remaining: (COUPON_POOL_SIZE - used).max(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn issue_is_one_per_customer() {
        let (db, _dir) = setup_db().await;
        issue(&db, "CPN-1", "u1").await.unwrap();
        issue(&db, "CPN-2", "u1").await.unwrap();

        let coupon = find_for_user(&db, "u1").await.unwrap().unwrap();
        assert_eq!(coupon.coupon_number, "CPN-1");
        assert_eq!(coupon.status, CouponStatus::NotUsed);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn attach_reports_rather_than_fails() {
        let (db, _dir) = setup_db().await;
        issue(&db, "CPN-1", "u1").await.unwrap();

        let rid = ReservationId::from("GR1".to_string());
        let outcomes = db
            .connection()
            .call(move |conn| {
                let missing = attach(conn, "u-none", &rid, "Happy Paws")?;
                let attached = attach(conn, "u1", &rid, "Happy Paws")?;
                Ok((missing, attached))
            })
            .await
            .unwrap();

        assert_eq!(outcomes.0, CouponOutcome::NoCoupon);
        assert_eq!(
            outcomes.1,
            CouponOutcome::Attached {
                coupon_number: "CPN-1".into()
            }
        );

        let coupon = find_for_user(&db, "u1").await.unwrap().unwrap();
        assert_eq!(coupon.reservation_id.as_deref(), Some("GR1"));
        assert_eq!(coupon.store_name.as_deref(), Some("Happy Paws"));
        // Attachment alone does not consume.
        assert_eq!(coupon.status, CouponStatus::NotUsed);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn finalize_consumes_once_and_stays_idempotent() {
        let (db, _dir) = setup_db().await;
        issue(&db, "CPN-1", "u1").await.unwrap();

        let rid = ReservationId::from("GR1".to_string());
        db.connection()
            .call(move |conn| {
                attach(conn, "u1", &rid, "Happy Paws")?;
                finalize(conn, &rid, 7)?;
                // Second finalize with another order must not restamp.
                finalize(conn, &rid, 99)?;
                Ok(())
            })
            .await
            .unwrap();

        let coupon = find_for_user(&db, "u1").await.unwrap().unwrap();
        assert_eq!(coupon.status, CouponStatus::Used);
        assert_eq!(coupon.order_id, Some(7));

        // A spent coupon reports AlreadyUsed on the next attach attempt.
        let rid = ReservationId::from("GR2".to_string());
        let outcome = db
            .connection()
            .call(move |conn| Ok(attach(conn, "u1", &rid, "Happy Paws")?))
            .await
            .unwrap();
        assert_eq!(outcome, CouponOutcome::AlreadyUsed);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn pool_stats_track_the_fixed_pool() {
        let (db, _dir) = setup_db().await;
        let fresh = pool_stats(&db).await.unwrap();
        assert_eq!(fresh.used, 0);
        assert_eq!(fresh.remaining, COUPON_POOL_SIZE);

        issue(&db, "CPN-1", "u1").await.unwrap();
        issue(&db, "CPN-2", "u2").await.unwrap();
        let rid = ReservationId::from("GR1".to_string());
        db.connection()
            .call(move |conn| {
                attach(conn, "u1", &rid, "Happy Paws")?;
                finalize(conn, &rid, 1)?;
                Ok(())
            })
            .await
            .unwrap();

        let stats = pool_stats(&db).await.unwrap();
        assert_eq!(stats.used, 1);
        assert_eq!(stats.remaining, COUPON_POOL_SIZE - 1);
        db.close().await.unwrap();
    }
}
