// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reservation row operations: insert, fetch, status updates, listings.
//!
//! All reservations live in one table with a `kind` column; the row mapper
//! rebuilds the kind-tagged detail from the nullable column set. Writes that
//! must be atomic with slot claims live in `booking`; this module provides
//! the transaction-scoped primitives it composes.

use std::str::FromStr;

use pawdesk_core::PawdeskError;
use pawdesk_core::types::{
    Reservation, ReservationDetail, ReservationId, ReservationKind, ReservationSnapshot,
    ReservationStatus,
};
use rusqlite::params;

use crate::database::Database;
use crate::models::{NewReservation, format_dt, parse_dt};

pub(crate) const RESERVATION_COLUMNS: &str = "reservation_id, kind, status, store_name, \
     user_name, user_phone, pet_name, pet_species, pet_breed, pet_size, pick_up_service, \
     customer_note, store_note, total_price, services, reservation_time, grooming_period, \
     room_type, checkin_at, checkout_at, created_at, updated_at";

/// Rebuild a domain reservation from a row selected with
/// [`RESERVATION_COLUMNS`].
pub(crate) fn map_reservation_row(row: &rusqlite::Row<'_>) -> Result<Reservation, rusqlite::Error> {
    let kind_raw: String = row.get(1)?;
    let kind = ReservationKind::from_str(&kind_raw)
        .map_err(|e| conv_err(1, e))?;
    let status_raw: String = row.get(2)?;
    let status = ReservationStatus::from_str(&status_raw)
        .map_err(|e| conv_err(2, e))?;

    let detail = match kind {
        ReservationKind::Grooming => {
            let services_raw: String = row.get(14)?;
            let services: Vec<String> =
                serde_json::from_str(&services_raw).map_err(|e| conv_err(14, e))?;
            let time_raw: String = row.get(15)?;
            ReservationDetail::Grooming {
                services,
                reservation_time: parse_dt(&time_raw).map_err(|e| conv_err(15, e))?,
                grooming_period: row.get(16)?,
            }
        }
        ReservationKind::Boarding => {
            let checkin_raw: String = row.get(18)?;
            let checkout_raw: String = row.get(19)?;
            ReservationDetail::Boarding {
                room_type: row.get(17)?,
                checkin_at: parse_dt(&checkin_raw).map_err(|e| conv_err(18, e))?,
                checkout_at: parse_dt(&checkout_raw).map_err(|e| conv_err(19, e))?,
            }
        }
    };

    Ok(Reservation {
        reservation_id: ReservationId::from(row.get::<_, String>(0)?),
        status,
        snapshot: ReservationSnapshot {
            store_name: row.get(3)?,
            user_name: row.get(4)?,
            user_phone: row.get(5)?,
            pet_name: row.get(6)?,
            pet_species: row.get(7)?,
            pet_breed: row.get(8)?,
            pet_size: row.get(9)?,
        },
        pick_up_service: row.get(10)?,
        customer_note: row.get(11)?,
        store_note: row.get(12)?,
        total_price: row.get(13)?,
        detail,
        created_at: row.get(20)?,
        updated_at: row.get(21)?,
    })
}

fn conv_err(
    idx: usize,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
}

/// True when a reservation row with this ID already exists.
pub(crate) fn id_exists(
    conn: &rusqlite::Connection,
    id: &ReservationId,
) -> Result<bool, rusqlite::Error> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM reservations WHERE reservation_id = ?1",
        params![id.as_str()],
        |row| row.get(0),
    )?;
    Ok(n > 0)
}

/// Insert a pending reservation row. Status and timestamps come from the
/// schema defaults.
pub(crate) fn insert_tx(
    conn: &rusqlite::Connection,
    id: &ReservationId,
    new: &NewReservation,
) -> Result<(), rusqlite::Error> {
    let (services, reservation_time, grooming_period, room_type, checkin_at, checkout_at) =
        match &new.detail {
            ReservationDetail::Grooming {
                services,
                reservation_time,
                grooming_period,
            } => (
                Some(serde_json::to_string(services).map_err(|e| {
                    rusqlite::Error::ToSqlConversionFailure(Box::new(e))
                })?),
                Some(format_dt(*reservation_time)),
                Some(*grooming_period),
                None,
                None,
                None,
            ),
            ReservationDetail::Boarding {
                room_type,
                checkin_at,
                checkout_at,
            } => (
                None,
                None,
                None,
                Some(room_type.clone()),
                Some(format_dt(*checkin_at)),
                Some(format_dt(*checkout_at)),
            ),
        };

    conn.execute(
        "INSERT INTO reservations
             (reservation_id, kind, store_name, user_name, user_phone, pet_name,
              pet_species, pet_breed, pet_size, pick_up_service, customer_note,
              total_price, services, reservation_time, grooming_period,
              room_type, checkin_at, checkout_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
        params![
            id.as_str(),
            new.detail.kind().to_string(),
            new.snapshot.store_name,
            new.snapshot.user_name,
            new.snapshot.user_phone,
            new.snapshot.pet_name,
            new.snapshot.pet_species,
            new.snapshot.pet_breed,
            new.snapshot.pet_size,
            new.pick_up_service,
            new.customer_note,
            new.total_price,
            services,
            reservation_time,
            grooming_period,
            room_type,
            checkin_at,
            checkout_at,
        ],
    )?;
    Ok(())
}

/// Fetch a reservation by ID inside a transaction.
pub(crate) fn fetch_tx(
    conn: &rusqlite::Connection,
    id: &ReservationId,
) -> Result<Option<Reservation>, rusqlite::Error> {
    let sql = format!(
        "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE reservation_id = ?1"
    );
    let result = conn.query_row(&sql, params![id.as_str()], map_reservation_row);
    match result {
        Ok(reservation) => Ok(Some(reservation)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Move a reservation to `status` and bump `updated_at`.
pub(crate) fn set_status_tx(
    conn: &rusqlite::Connection,
    id: &ReservationId,
    status: ReservationStatus,
) -> Result<(), rusqlite::Error> {
    conn.execute(
        "UPDATE reservations
         SET status = ?1, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
         WHERE reservation_id = ?2",
        params![status.to_string(), id.as_str()],
    )?;
    Ok(())
}

/// Set the staff-facing note. Returns the number of rows touched.
pub(crate) fn set_store_note_tx(
    conn: &rusqlite::Connection,
    id: &ReservationId,
    note: &str,
) -> Result<usize, rusqlite::Error> {
    conn.execute(
        "UPDATE reservations
         SET store_note = ?1, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
         WHERE reservation_id = ?2",
        params![note, id.as_str()],
    )
}

/// Get a reservation by ID.
pub async fn get(db: &Database, id: &ReservationId) -> Result<Option<Reservation>, PawdeskError> {
    let id = id.clone();
    db.connection()
        .call(move |conn| Ok(fetch_tx(conn, &id)?))
        .await
        .map_err(crate::database::map_tr_err)
}

/// Pending reservations for a store, newest first.
pub async fn list_pending(
    db: &Database,
    store_name: &str,
    kind: Option<ReservationKind>,
    limit: i64,
) -> Result<Vec<Reservation>, PawdeskError> {
    let sql = format!(
        "SELECT {RESERVATION_COLUMNS} FROM reservations
         WHERE store_name = ?1 AND status = 'pending' AND (?2 IS NULL OR kind = ?2)
         ORDER BY created_at DESC LIMIT ?3"
    );
    list_with(db, sql, store_name, kind, limit).await
}

/// Confirmed reservations for a store, soonest service first.
pub async fn list_confirmed(
    db: &Database,
    store_name: &str,
    kind: Option<ReservationKind>,
    limit: i64,
) -> Result<Vec<Reservation>, PawdeskError> {
    let sql = format!(
        "SELECT {RESERVATION_COLUMNS} FROM reservations
         WHERE store_name = ?1 AND status = 'confirmed' AND (?2 IS NULL OR kind = ?2)
         ORDER BY COALESCE(reservation_time, checkin_at) ASC LIMIT ?3"
    );
    list_with(db, sql, store_name, kind, limit).await
}

/// Settled reservations (finished or cancelled), most recently touched first.
pub async fn list_history(
    db: &Database,
    store_name: &str,
    kind: Option<ReservationKind>,
    limit: i64,
) -> Result<Vec<Reservation>, PawdeskError> {
    let sql = format!(
        "SELECT {RESERVATION_COLUMNS} FROM reservations
         WHERE store_name = ?1 AND status IN ('finished', 'cancelled')
           AND (?2 IS NULL OR kind = ?2)
         ORDER BY updated_at DESC LIMIT ?3"
    );
    list_with(db, sql, store_name, kind, limit).await
}

async fn list_with(
    db: &Database,
    sql: String,
    store_name: &str,
    kind: Option<ReservationKind>,
    limit: i64,
) -> Result<Vec<Reservation>, PawdeskError> {
    let store_name = store_name.to_string();
    let kind = kind.map(|k| k.to_string());
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![store_name, kind, limit], map_reservation_row)?;
            let mut reservations = Vec::new();
            for row in rows {
                reservations.push(row?);
            }
            Ok(reservations)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Update the staff note outside any lifecycle transition.
pub async fn update_store_note(
    db: &Database,
    id: &ReservationId,
    note: &str,
) -> Result<(), PawdeskError> {
    let note = note.to_string();
    let touched = {
        let id = id.clone();
        db.connection()
            .call(move |conn| Ok(set_store_note_tx(conn, &id, &note)?))
            .await
            .map_err(crate::database::map_tr_err)?
    };
    if touched == 0 {
        return Err(PawdeskError::not_found("reservation", id.as_str().to_string()));
    }
    Ok(())
}

/// Finished reservations at a store for a snapshot identity, excluding one
/// reservation. Feeds the customer-history panel on the details view.
pub async fn finished_history_for_identity(
    db: &Database,
    store_name: &str,
    user_name: &str,
    user_phone: &str,
    exclude: &ReservationId,
    limit: i64,
) -> Result<Vec<Reservation>, PawdeskError> {
    let store_name = store_name.to_string();
    let user_name = user_name.to_string();
    let user_phone = user_phone.to_string();
    let exclude = exclude.clone();
    let sql = format!(
        "SELECT {RESERVATION_COLUMNS} FROM reservations
         WHERE store_name = ?1 AND user_name = ?2 AND user_phone = ?3
           AND status = 'finished' AND reservation_id <> ?4
         ORDER BY updated_at DESC LIMIT ?5"
    );
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(
                params![store_name, user_name, user_phone, exclude.as_str(), limit],
                map_reservation_row,
            )?;
            let mut reservations = Vec::new();
            for row in rows {
                reservations.push(row?);
            }
            Ok(reservations)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Reservation counts grouped by status, across all stores.
pub async fn status_counts(
    db: &Database,
) -> Result<Vec<(ReservationStatus, i64)>, PawdeskError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT status, COUNT(*) FROM reservations GROUP BY status ORDER BY status",
            )?;
            let rows = stmt.query_map([], |row| {
                let raw: String = row.get(0)?;
                let status = ReservationStatus::from_str(&raw).map_err(|e| conv_err(0, e))?;
                Ok((status, row.get::<_, i64>(1)?))
            })?;
            let mut counts = Vec::new();
            for row in rows {
                counts.push(row?);
            }
            Ok(counts)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    use crate::models::NewReservation;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn dt(d: u32, h: u32, min: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn snapshot(store: &str, user: &str) -> ReservationSnapshot {
        ReservationSnapshot {
            store_name: store.to_string(),
            user_name: user.to_string(),
            user_phone: "0912000111".into(),
            pet_name: "Mochi".into(),
            pet_species: "dog".into(),
            pet_breed: "corgi".into(),
            pet_size: "medium".into(),
        }
    }

    fn grooming_new(store: &str, user: &str, d: u32, h: u32) -> NewReservation {
        NewReservation {
            snapshot: snapshot(store, user),
            pick_up_service: false,
            customer_note: Some("first visit".into()),
            total_price: 600,
            detail: ReservationDetail::Grooming {
                services: vec!["Bath".into(), "Nail Trim".into()],
                reservation_time: dt(d, h, 0),
                grooming_period: 45,
            },
            coupon_user: None,
        }
    }

    fn boarding_new(store: &str, user: &str) -> NewReservation {
        NewReservation {
            snapshot: snapshot(store, user),
            pick_up_service: true,
            customer_note: None,
            total_price: 1500,
            detail: ReservationDetail::Boarding {
                room_type: "standard".into(),
                checkin_at: dt(10, 14, 0),
                checkout_at: dt(13, 10, 0),
            },
            coupon_user: None,
        }
    }

    async fn insert(db: &Database, id: &str, new: NewReservation) {
        let id = ReservationId::from(id.to_string());
        db.connection()
            .call(move |conn| {
                insert_tx(conn, &id, &new)?;
                Ok(())
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn grooming_row_round_trips_through_the_mapper() {
        let (db, _dir) = setup_db().await;
        insert(&db, "GR202603011000000001", grooming_new("Happy Paws", "Lin Wei", 1, 10)).await;

        let found = get(&db, &ReservationId::from("GR202603011000000001".to_string()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.status, ReservationStatus::Pending);
        assert_eq!(found.kind(), ReservationKind::Grooming);
        assert_eq!(found.snapshot.store_name, "Happy Paws");
        assert_eq!(found.customer_note.as_deref(), Some("first visit"));
        match &found.detail {
            ReservationDetail::Grooming {
                services,
                reservation_time,
                grooming_period,
            } => {
                assert_eq!(services, &vec!["Bath".to_string(), "Nail Trim".to_string()]);
                assert_eq!(*reservation_time, dt(1, 10, 0));
                assert_eq!(*grooming_period, 45);
            }
            other => panic!("unexpected detail: {other:?}"),
        }
        assert!(!found.created_at.is_empty());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn boarding_row_round_trips_through_the_mapper() {
        let (db, _dir) = setup_db().await;
        insert(&db, "BD202603101400000001", boarding_new("Happy Paws", "Lin Wei")).await;

        let found = get(&db, &ReservationId::from("BD202603101400000001".to_string()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.kind(), ReservationKind::Boarding);
        assert!(found.pick_up_service);
        match &found.detail {
            ReservationDetail::Boarding {
                room_type,
                checkin_at,
                checkout_at,
            } => {
                assert_eq!(room_type, "standard");
                assert_eq!(*checkin_at, dt(10, 14, 0));
                assert_eq!(*checkout_at, dt(13, 10, 0));
            }
            other => panic!("unexpected detail: {other:?}"),
        }

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_missing_reservation_returns_none() {
        let (db, _dir) = setup_db().await;
        let found = get(&db, &ReservationId::from("GR000".to_string())).await.unwrap();
        assert!(found.is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn listings_filter_by_store_status_and_kind() {
        let (db, _dir) = setup_db().await;
        insert(&db, "GR1", grooming_new("Happy Paws", "Lin Wei", 1, 10)).await;
        insert(&db, "GR2", grooming_new("Happy Paws", "Chen Yu", 2, 11)).await;
        insert(&db, "BD1", boarding_new("Happy Paws", "Lin Wei")).await;
        insert(&db, "GR3", grooming_new("Other Store", "Lin Wei", 1, 10)).await;

        let pending = list_pending(&db, "Happy Paws", None, 50).await.unwrap();
        assert_eq!(pending.len(), 3);

        let grooming_only = list_pending(&db, "Happy Paws", Some(ReservationKind::Grooming), 50)
            .await
            .unwrap();
        assert_eq!(grooming_only.len(), 2);

        // Confirm two and check the confirmed ordering by service time.
        let id = ReservationId::from("GR2".to_string());
        db.connection()
            .call(move |conn| {
                set_status_tx(conn, &id, ReservationStatus::Confirmed)?;
                Ok(())
            })
            .await
            .unwrap();
        let id = ReservationId::from("BD1".to_string());
        db.connection()
            .call(move |conn| {
                set_status_tx(conn, &id, ReservationStatus::Confirmed)?;
                Ok(())
            })
            .await
            .unwrap();

        let confirmed = list_confirmed(&db, "Happy Paws", None, 50).await.unwrap();
        assert_eq!(confirmed.len(), 2);
        // GR2 is on the 2nd, BD1 checks in on the 10th.
        assert_eq!(confirmed[0].reservation_id.as_str(), "GR2");
        assert_eq!(confirmed[1].reservation_id.as_str(), "BD1");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn history_lists_settled_reservations() {
        let (db, _dir) = setup_db().await;
        insert(&db, "GR1", grooming_new("Happy Paws", "Lin Wei", 1, 10)).await;
        insert(&db, "GR2", grooming_new("Happy Paws", "Lin Wei", 2, 10)).await;
        insert(&db, "GR3", grooming_new("Happy Paws", "Lin Wei", 3, 10)).await;

        for (id, status) in [
            ("GR1", ReservationStatus::Finished),
            ("GR2", ReservationStatus::Cancelled),
        ] {
            let id = ReservationId::from(id.to_string());
            db.connection()
                .call(move |conn| {
                    set_status_tx(conn, &id, status)?;
                    Ok(())
                })
                .await
                .unwrap();
        }

        let history = list_history(&db, "Happy Paws", None, 50).await.unwrap();
        let ids: Vec<&str> = history.iter().map(|r| r.reservation_id.as_str()).collect();
        assert_eq!(history.len(), 2);
        assert!(ids.contains(&"GR1") && ids.contains(&"GR2"));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn store_note_update_requires_an_existing_row() {
        let (db, _dir) = setup_db().await;
        insert(&db, "GR1", grooming_new("Happy Paws", "Lin Wei", 1, 10)).await;

        update_store_note(&db, &ReservationId::from("GR1".to_string()), "bring towel")
            .await
            .unwrap();
        let found = get(&db, &ReservationId::from("GR1".to_string()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.store_note.as_deref(), Some("bring towel"));

        let err = update_store_note(&db, &ReservationId::from("GR9".to_string()), "x")
            .await
            .unwrap_err();
        assert!(matches!(err, PawdeskError::NotFound { .. }));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn identity_history_is_scoped_and_excludes_the_viewed_row() {
        let (db, _dir) = setup_db().await;
        insert(&db, "GR1", grooming_new("Happy Paws", "Lin Wei", 1, 10)).await;
        insert(&db, "GR2", grooming_new("Happy Paws", "Lin Wei", 2, 10)).await;
        insert(&db, "GR3", grooming_new("Other Store", "Lin Wei", 3, 10)).await;

        for id in ["GR1", "GR2", "GR3"] {
            let id = ReservationId::from(id.to_string());
            db.connection()
                .call(move |conn| {
                    set_status_tx(conn, &id, ReservationStatus::Finished)?;
                    Ok(())
                })
                .await
                .unwrap();
        }

        let history = finished_history_for_identity(
            &db,
            "Happy Paws",
            "Lin Wei",
            "0912000111",
            &ReservationId::from("GR2".to_string()),
            20,
        )
        .await
        .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].reservation_id.as_str(), "GR1");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn status_counts_group_every_state() {
        let (db, _dir) = setup_db().await;
        insert(&db, "GR1", grooming_new("Happy Paws", "Lin Wei", 1, 10)).await;
        insert(&db, "GR2", grooming_new("Happy Paws", "Lin Wei", 2, 10)).await;
        let id = ReservationId::from("GR2".to_string());
        db.connection()
            .call(move |conn| {
                set_status_tx(conn, &id, ReservationStatus::Confirmed)?;
                Ok(())
            })
            .await
            .unwrap();

        let counts = status_counts(&db).await.unwrap();
        assert!(counts.contains(&(ReservationStatus::Pending, 1)));
        assert!(counts.contains(&(ReservationStatus::Confirmed, 1)));

        db.close().await.unwrap();
    }
}
