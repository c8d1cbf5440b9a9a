// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record types for the directory and pricing catalog, plus the products
//! of the booking transactions.
//!
//! Reservation, coupon, and order types are defined in `pawdesk-core::types`
//! for use across crate boundaries; this module re-exports them and adds the
//! rows that only exist at the persistence layer's API.

use chrono::NaiveDateTime;
use pawdesk_core::pricing::{BoardingTier, DurationUnit};
use pawdesk_core::types::{
    Reservation, ReservationDetail, ReservationId, ReservationSnapshot, ReservationStatus,
};
use serde::{Deserialize, Serialize};

pub use pawdesk_core::types::{Coupon, Order};

/// Storage text format for instants. Lexicographic order matches
/// chronological order, so TEXT range scans work.
pub(crate) const DATETIME_FMT: &str = "%Y-%m-%dT%H:%M:%S";
pub(crate) const DATE_FMT: &str = "%Y-%m-%d";
pub(crate) const TIME_FMT: &str = "%H:%M";

pub(crate) fn format_dt(dt: NaiveDateTime) -> String {
    dt.format(DATETIME_FMT).to_string()
}

pub(crate) fn parse_dt(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, DATETIME_FMT)
}

/// A registered customer account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub user_id: String,
    pub full_name: String,
    pub phone: String,
}

/// A store offering grooming and/or boarding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub store_name: String,
    #[serde(default)]
    pub phone: String,
}

/// A pet registered under a customer account. `(user_id, pet_name)` is the
/// lookup key everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetRecord {
    pub user_id: String,
    pub pet_name: String,
    pub species: String,
    pub breed: String,
    pub size: String,
    pub fur_amount: String,
}

/// One grooming catalog row: price and duration for a service at a store,
/// keyed by the pet's size and fur amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroomingPriceRecord {
    pub store_name: String,
    pub service_title: String,
    pub pet_size: String,
    pub fur_amount: String,
    pub price: i64,
    pub duration_minutes: i64,
}

/// A boarding room type at a store and its physical capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomTypeRecord {
    pub store_name: String,
    pub room_type: String,
    pub species: String,
    pub room_count: i64,
    #[serde(default = "default_pet_capacity")]
    pub pet_capacity: i64,
}

fn default_pet_capacity() -> i64 {
    1
}

/// One boarding pricing bracket as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardingTierRecord {
    pub store_name: String,
    pub room_type: String,
    pub duration: i64,
    pub duration_unit: DurationUnit,
    pub price_per_day: i64,
}

impl BoardingTierRecord {
    /// The catalog row stripped to the fields tier selection needs.
    pub fn tier(&self) -> BoardingTier {
        BoardingTier {
            duration: self.duration,
            duration_unit: self.duration_unit,
            price_per_day: self.price_per_day,
        }
    }
}

/// Everything the booking transaction needs to persist a reservation.
/// The reservation ID is generated inside the transaction, not here.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub snapshot: ReservationSnapshot,
    pub pick_up_service: bool,
    pub customer_note: Option<String>,
    pub total_price: i64,
    pub detail: ReservationDetail,
    /// Grooming only: attach this customer's coupon if they hold one.
    pub coupon_user: Option<String>,
}

/// What happened to the customer's coupon during reservation creation.
/// Never an error; a missing or spent coupon does not block the booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CouponOutcome {
    NotRequested,
    NoCoupon,
    AlreadyUsed,
    Attached { coupon_number: String },
}

/// A committed reservation plus its coupon outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedReservation {
    pub reservation: Reservation,
    pub coupon: CouponOutcome,
}

/// Result of a committed lifecycle transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub reservation_id: ReservationId,
    pub old_status: ReservationStatus,
    pub new_status: ReservationStatus,
    /// Set when the transition was a completion and wrote an order.
    pub order_id: Option<i64>,
}

/// A finished reservation joined with its order, for the risk view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReservation {
    pub order_id: i64,
    pub blacklist: bool,
    #[serde(flatten)]
    pub reservation: Reservation,
}

/// Boarding occupancy for one room type over one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomOccupancy {
    pub room_type: String,
    pub species: String,
    pub room_count: i64,
    pub pet_capacity: i64,
    /// Peak number of rooms simultaneously occupied during the day.
    pub occupied_rooms: i64,
    pub available_rooms: i64,
    /// Animals the type can host when every room is full.
    pub pet_slots: i64,
}

/// Coupon pool consumption across the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponPoolStats {
    pub used: i64,
    pub remaining: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn datetime_text_round_trips() {
        let dt = NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(10, 15, 0)
            .unwrap();
        let s = format_dt(dt);
        assert_eq!(s, "2026-03-01T10:15:00");
        assert_eq!(parse_dt(&s).unwrap(), dt);
    }

    #[test]
    fn coupon_outcome_serializes_with_outcome_tag() {
        let json = serde_json::to_value(CouponOutcome::Attached {
            coupon_number: "CPN-7".into(),
        })
        .unwrap();
        assert_eq!(json["outcome"], "attached");
        assert_eq!(json["coupon_number"], "CPN-7");

        let json = serde_json::to_value(CouponOutcome::NoCoupon).unwrap();
        assert_eq!(json["outcome"], "no_coupon");
    }
}
