// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pricing catalog operations for grooming services and boarding rooms.

use std::str::FromStr;

use pawdesk_core::PawdeskError;
use pawdesk_core::pricing::DurationUnit;
use rusqlite::params;

use crate::database::Database;
use crate::models::{BoardingTierRecord, GroomingPriceRecord, RoomTypeRecord};

/// Insert or update a grooming catalog row.
pub async fn upsert_grooming_price(
    db: &Database,
    price: &GroomingPriceRecord,
) -> Result<(), PawdeskError> {
    let price = price.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO grooming_pricing
                     (store_name, service_title, pet_size, fur_amount, price, duration_minutes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT (store_name, service_title, pet_size, fur_amount)
                 DO UPDATE SET price = ?5, duration_minutes = ?6",
                params![
                    price.store_name,
                    price.service_title,
                    price.pet_size,
                    price.fur_amount,
                    price.price,
                    price.duration_minutes,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Look up catalog rows for a list of services, keyed by the pet's size and
/// fur amount. The result is aligned with the input order; `None` marks a
/// service the store does not price for that pet.
pub async fn grooming_prices(
    db: &Database,
    store_name: &str,
    services: Vec<String>,
    pet_size: &str,
    fur_amount: &str,
) -> Result<Vec<Option<GroomingPriceRecord>>, PawdeskError> {
    let store_name = store_name.to_string();
    let pet_size = pet_size.to_string();
    let fur_amount = fur_amount.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT store_name, service_title, pet_size, fur_amount, price, duration_minutes
                 FROM grooming_pricing
                 WHERE store_name = ?1 AND service_title = ?2
                   AND pet_size = ?3 AND fur_amount = ?4",
            )?;
            let mut found = Vec::with_capacity(services.len());
            for service in &services {
                let result = stmt.query_row(
                    params![store_name, service, pet_size, fur_amount],
                    |row| {
                        Ok(GroomingPriceRecord {
                            store_name: row.get(0)?,
                            service_title: row.get(1)?,
                            pet_size: row.get(2)?,
                            fur_amount: row.get(3)?,
                            price: row.get(4)?,
                            duration_minutes: row.get(5)?,
                        })
                    },
                );
                match result {
                    Ok(price) => found.push(Some(price)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => found.push(None),
                    Err(e) => return Err(e.into()),
                }
            }
            Ok(found)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert or update a boarding room type.
pub async fn upsert_room_type(db: &Database, room: &RoomTypeRecord) -> Result<(), PawdeskError> {
    let room = room.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO room_types (store_name, room_type, species, room_count, pet_capacity)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT (store_name, room_type)
                 DO UPDATE SET species = ?3, room_count = ?4, pet_capacity = ?5",
                params![
                    room.store_name,
                    room.room_type,
                    room.species,
                    room.room_count,
                    room.pet_capacity,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert or update a boarding pricing bracket.
pub async fn upsert_boarding_tier(
    db: &Database,
    tier: &BoardingTierRecord,
) -> Result<(), PawdeskError> {
    let tier = tier.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO boarding_pricing
                     (store_name, room_type, duration, duration_unit, price_per_day)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT (store_name, room_type, duration, duration_unit)
                 DO UPDATE SET price_per_day = ?5",
                params![
                    tier.store_name,
                    tier.room_type,
                    tier.duration,
                    tier.duration_unit.to_string(),
                    tier.price_per_day,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// A room type together with its pricing brackets. `None` when the store
/// has no such room type at all; an existing room type with no brackets
/// comes back with an empty tier list.
pub async fn boarding_catalog(
    db: &Database,
    store_name: &str,
    room_type: &str,
) -> Result<Option<(RoomTypeRecord, Vec<BoardingTierRecord>)>, PawdeskError> {
    let store_name = store_name.to_string();
    let room_type = room_type.to_string();
    db.connection()
        .call(move |conn| {
            let Some(room) = find_room_type_tx(conn, &store_name, &room_type)? else {
                return Ok(None);
            };

            let mut stmt = conn.prepare(
                "SELECT store_name, room_type, duration, duration_unit, price_per_day
                 FROM boarding_pricing
                 WHERE store_name = ?1 AND room_type = ?2
                 ORDER BY duration * CASE duration_unit
                     WHEN 'day' THEN 1 WHEN 'week' THEN 7 ELSE 30 END",
            )?;
            let rows = stmt.query_map(params![store_name, room_type], |row| {
                let unit: String = row.get(3)?;
                Ok(BoardingTierRecord {
                    store_name: row.get(0)?,
                    room_type: row.get(1)?,
                    duration: row.get(2)?,
                    duration_unit: parse_unit(3, &unit)?,
                    price_per_day: row.get(4)?,
                })
            })?;
            let mut tiers = Vec::new();
            for row in rows {
                tiers.push(row?);
            }
            Ok(Some((room, tiers)))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Room type lookup usable inside a booking transaction.
pub(crate) fn find_room_type_tx(
    conn: &rusqlite::Connection,
    store_name: &str,
    room_type: &str,
) -> Result<Option<RoomTypeRecord>, rusqlite::Error> {
    let result = conn.query_row(
        "SELECT store_name, room_type, species, room_count, pet_capacity
         FROM room_types WHERE store_name = ?1 AND room_type = ?2",
        params![store_name, room_type],
        |row| {
            Ok(RoomTypeRecord {
                store_name: row.get(0)?,
                room_type: row.get(1)?,
                species: row.get(2)?,
                room_count: row.get(3)?,
                pet_capacity: row.get(4)?,
            })
        },
    );
    match result {
        Ok(room) => Ok(Some(room)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

fn parse_unit(idx: usize, raw: &str) -> Result<DurationUnit, rusqlite::Error> {
    DurationUnit::from_str(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
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

    fn bath(price: i64, minutes: i64) -> GroomingPriceRecord {
        GroomingPriceRecord {
            store_name: "Happy Paws".into(),
            service_title: "Bath".into(),
            pet_size: "medium".into(),
            fur_amount: "normal".into(),
            price,
            duration_minutes: minutes,
        }
    }

    #[tokio::test]
    async fn grooming_prices_align_with_requested_services() {
        let (db, _dir) = setup_db().await;
        upsert_grooming_price(&db, &bath(600, 45)).await.unwrap();

        let found = grooming_prices(
            &db,
            "Happy Paws",
            vec!["Bath".into(), "Nail Trim".into()],
            "medium",
            "normal",
        )
        .await
        .unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].as_ref().unwrap().price, 600);
        assert!(found[1].is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn grooming_price_is_keyed_by_size_and_fur() {
        let (db, _dir) = setup_db().await;
        upsert_grooming_price(&db, &bath(600, 45)).await.unwrap();

        let other_size = grooming_prices(&db, "Happy Paws", vec!["Bath".into()], "large", "normal")
            .await
            .unwrap();
        assert!(other_size[0].is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn boarding_catalog_distinguishes_missing_room_from_missing_pricing() {
        let (db, _dir) = setup_db().await;
        let room = RoomTypeRecord {
            store_name: "Happy Paws".into(),
            room_type: "standard".into(),
            species: "dog".into(),
            room_count: 2,
            pet_capacity: 1,
        };
        upsert_room_type(&db, &room).await.unwrap();

        assert!(boarding_catalog(&db, "Happy Paws", "suite").await.unwrap().is_none());

        let (found, tiers) = boarding_catalog(&db, "Happy Paws", "standard")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.room_count, 2);
        assert!(tiers.is_empty());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn boarding_tiers_come_back_sorted_by_bracket_length() {
        let (db, _dir) = setup_db().await;
        upsert_room_type(
            &db,
            &RoomTypeRecord {
                store_name: "Happy Paws".into(),
                room_type: "standard".into(),
                species: "dog".into(),
                room_count: 2,
                pet_capacity: 1,
            },
        )
        .await
        .unwrap();

        for (duration, unit, price) in [
            (1, DurationUnit::Month, 350),
            (1, DurationUnit::Day, 500),
            (1, DurationUnit::Week, 420),
        ] {
            upsert_boarding_tier(
                &db,
                &BoardingTierRecord {
                    store_name: "Happy Paws".into(),
                    room_type: "standard".into(),
                    duration,
                    duration_unit: unit,
                    price_per_day: price,
                },
            )
            .await
            .unwrap();
        }

        let (_, tiers) = boarding_catalog(&db, "Happy Paws", "standard")
            .await
            .unwrap()
            .unwrap();
        let prices: Vec<i64> = tiers.iter().map(|t| t.price_per_day).collect();
        assert_eq!(prices, vec![500, 420, 350]);
        db.close().await.unwrap();
    }
}
