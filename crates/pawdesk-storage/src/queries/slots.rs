// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slot marker claims and occupancy reads.
//!
//! Claims run inside the booking transaction and check before inserting:
//! a grooming marker is free only if no row holds it, a boarding marker is
//! free while fewer than `room_count` rows hold it. The unique indexes on
//! the slot tables back these checks up but are not the primary mechanism.

use chrono::{Days, NaiveDate, NaiveDateTime};
use pawdesk_core::PawdeskError;
use pawdesk_core::types::ReservationId;
use rusqlite::params;

use crate::database::Database;
use crate::models::{DATE_FMT, TIME_FMT, RoomOccupancy, format_dt};

/// Claim every grooming marker for a reservation, or report the first
/// marker already taken. On a conflict the caller rolls the transaction
/// back, so partially claimed markers never persist.
pub(crate) fn claim_grooming(
    conn: &rusqlite::Connection,
    reservation_id: &ReservationId,
    store_name: &str,
    markers: &[NaiveDateTime],
) -> Result<Option<NaiveDateTime>, rusqlite::Error> {
    let mut check = conn.prepare(
        "SELECT EXISTS (
             SELECT 1 FROM grooming_slots
             WHERE store_name = ?1 AND slot_date = ?2 AND slot_time = ?3
         )",
    )?;
    let mut insert = conn.prepare(
        "INSERT INTO grooming_slots (reservation_id, store_name, slot_date, slot_time)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    for marker in markers {
        let slot_date = marker.format(DATE_FMT).to_string();
        let slot_time = marker.format(TIME_FMT).to_string();
        let taken: bool = check.query_row(params![store_name, slot_date, slot_time], |row| {
            row.get(0)
        })?;
        if taken {
            return Ok(Some(*marker));
        }
        insert.execute(params![reservation_id.as_str(), store_name, slot_date, slot_time])?;
    }
    Ok(None)
}

/// Claim every boarding marker for a reservation against a room type with
/// `room_count` physical rooms, or report the first marker where all rooms
/// are taken. The claimed unit is the room ordinal at that marker.
pub(crate) fn claim_boarding(
    conn: &rusqlite::Connection,
    reservation_id: &ReservationId,
    store_name: &str,
    room_type: &str,
    markers: &[NaiveDateTime],
    room_count: i64,
) -> Result<Option<NaiveDateTime>, rusqlite::Error> {
    let mut count = conn.prepare(
        "SELECT COUNT(*) FROM boarding_slots
         WHERE store_name = ?1 AND room_type = ?2 AND slot_at = ?3",
    )?;
    let mut insert = conn.prepare(
        "INSERT INTO boarding_slots (reservation_id, store_name, room_type, slot_at, unit)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;

    for marker in markers {
        let slot_at = format_dt(*marker);
        let occupied: i64 =
            count.query_row(params![store_name, room_type, slot_at], |row| row.get(0))?;
        if occupied >= room_count {
            return Ok(Some(*marker));
        }
        insert.execute(params![
            reservation_id.as_str(),
            store_name,
            room_type,
            slot_at,
            occupied,
        ])?;
    }
    Ok(None)
}

/// Release every marker a reservation holds, both kinds.
pub(crate) fn delete_for_reservation_tx(
    conn: &rusqlite::Connection,
    reservation_id: &ReservationId,
) -> Result<(), rusqlite::Error> {
    conn.execute(
        "DELETE FROM grooming_slots WHERE reservation_id = ?1",
        params![reservation_id.as_str()],
    )?;
    conn.execute(
        "DELETE FROM boarding_slots WHERE reservation_id = ?1",
        params![reservation_id.as_str()],
    )?;
    Ok(())
}

/// Occupied grooming times (HH:MM) at a store on a calendar day, sorted.
pub async fn occupied_grooming_times(
    db: &Database,
    store_name: &str,
    date: NaiveDate,
) -> Result<Vec<String>, PawdeskError> {
    let store_name = store_name.to_string();
    let slot_date = date.format(DATE_FMT).to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT slot_time FROM grooming_slots
                 WHERE store_name = ?1 AND slot_date = ?2
                 ORDER BY slot_time ASC",
            )?;
            let rows = stmt.query_map(params![store_name, slot_date], |row| row.get(0))?;
            let mut times = Vec::new();
            for row in rows {
                times.push(row?);
            }
            Ok(times)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Per-room-type boarding occupancy at a store for one calendar day.
///
/// Occupancy is the peak concurrent room usage over the day's half-hour
/// markers, so a room freed in the morning and refilled at night counts
/// once per marker, not twice.
pub async fn boarding_occupancy(
    db: &Database,
    store_name: &str,
    date: NaiveDate,
) -> Result<Vec<RoomOccupancy>, PawdeskError> {
    let store_name = store_name.to_string();
    let day_start = format_dt(
        date.and_hms_opt(0, 0, 0)
            .ok_or_else(|| PawdeskError::validation("date out of range"))?,
    );
    let next_day = date
        .checked_add_days(Days::new(1))
        .ok_or_else(|| PawdeskError::validation("date out of range"))?;
    let day_end = format_dt(
        next_day
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| PawdeskError::validation("date out of range"))?,
    );

    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT rt.room_type, rt.species, rt.room_count, rt.pet_capacity,
                        COALESCE(occ.peak, 0)
                 FROM room_types rt
                 LEFT JOIN (
                     SELECT room_type, MAX(cnt) AS peak
                     FROM (
                         SELECT room_type, slot_at, COUNT(*) AS cnt
                         FROM boarding_slots
                         WHERE store_name = ?1 AND slot_at >= ?2 AND slot_at < ?3
                         GROUP BY room_type, slot_at
                     )
                     GROUP BY room_type
                 ) occ ON occ.room_type = rt.room_type
                 WHERE rt.store_name = ?1
                 ORDER BY rt.room_type ASC",
            )?;
            let rows = stmt.query_map(params![store_name, day_start, day_end], |row| {
                let room_count: i64 = row.get(2)?;
                let pet_capacity: i64 = row.get(3)?;
                let occupied_rooms: i64 = row.get(4)?;
                Ok(RoomOccupancy {
                    room_type: row.get(0)?,
                    species: row.get(1)?,
                    room_count,
                    pet_capacity,
                    occupied_rooms,
                    available_rooms: (room_count - occupied_rooms).max(0),
                    pet_slots: room_count * pet_capacity,
                })
            })?;
            let mut occupancy = Vec::new();
            for row in rows {
                occupancy.push(row?);
            }
            Ok(occupancy)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
