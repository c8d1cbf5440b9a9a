// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types for reservations, coupons, and orders.
//!
//! The reservation model is a sum type: one `Reservation` struct for the
//! fields both kinds share (including the denormalized snapshot taken at
//! booking time) plus a kind-tagged [`ReservationDetail`] for the
//! grooming/boarding payload. All dispatch is by matching on the tag; the
//! `GR`/`BD` ID prefix is derived from the tag for display and parsed only
//! when an external caller hands us a bare ID string.

use chrono::NaiveDateTime;
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Total number of promotional coupons the platform issues. The coupon pool
/// stat reports `COUPON_POOL_SIZE - used` as remaining.
pub const COUPON_POOL_SIZE: i64 = 84;

/// The two reservation kinds the platform books.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReservationKind {
    Grooming,
    Boarding,
}

impl ReservationKind {
    /// Two-letter code embedded at the front of every reservation ID.
    pub fn prefix(self) -> &'static str {
        match self {
            ReservationKind::Grooming => "GR",
            ReservationKind::Boarding => "BD",
        }
    }

    /// Recover the kind from a bare ID string, for callers that only hold
    /// the ID. Returns `None` for unrecognized prefixes.
    pub fn from_id_prefix(id: &str) -> Option<Self> {
        match id.get(..2) {
            Some("GR") => Some(ReservationKind::Grooming),
            Some("BD") => Some(ReservationKind::Boarding),
            _ => None,
        }
    }
}

/// Reservation lifecycle states.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Finished,
}

impl ReservationStatus {
    /// Terminal states accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, ReservationStatus::Cancelled | ReservationStatus::Finished)
    }

    /// The legality table of the lifecycle state machine. Returns the
    /// successor state, or `None` when the action is not legal from `self`
    /// (the caller reports that as an invalid transition without mutating
    /// anything).
    pub fn next(self, action: TransitionAction) -> Option<ReservationStatus> {
        use ReservationStatus::*;
        use TransitionAction::*;
        match (self, action) {
            (Pending, Confirm) => Some(Confirmed),
            (Pending, Cancel) | (Confirmed, Cancel) => Some(Cancelled),
            (Confirmed, Complete) => Some(Finished),
            _ => None,
        }
    }
}

/// Lifecycle actions a caller can request on a reservation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransitionAction {
    Confirm,
    Cancel,
    Complete,
}

/// Coupon lifecycle: issued unused, consumed at most once.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CouponStatus {
    NotUsed,
    Used,
}

/// Unique reservation identifier: kind prefix + creation timestamp + a
/// 4-digit random suffix, e.g. `GR202603011000120042`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationId(pub String);

impl ReservationId {
    /// Generate a fresh ID for `kind` stamped with `at`.
    ///
    /// The suffix keeps IDs generated within the same second distinct;
    /// uniqueness is still verified against storage before insert.
    pub fn generate(kind: ReservationKind, at: NaiveDateTime, rng: &mut impl Rng) -> Self {
        ReservationId(format!(
            "{}{}{:04}",
            kind.prefix(),
            at.format("%Y%m%d%H%M%S"),
            rng.gen_range(0..10_000)
        ))
    }

    /// The kind encoded in this ID's prefix, if recognizable.
    pub fn kind(&self) -> Option<ReservationKind> {
        ReservationKind::from_id_prefix(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReservationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ReservationId {
    fn from(s: String) -> Self {
        ReservationId(s)
    }
}

/// Customer/pet/store data copied into the reservation at booking time.
///
/// Deliberately denormalized: the reservation is a historical record and must
/// read the same after the customer renames a pet or changes their phone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationSnapshot {
    pub store_name: String,
    pub user_name: String,
    pub user_phone: String,
    pub pet_name: String,
    pub pet_species: String,
    pub pet_breed: String,
    pub pet_size: String,
}

/// Kind-specific reservation payload, tagged for wire dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReservationDetail {
    Grooming {
        /// Ordered list of booked service titles.
        services: Vec<String>,
        /// Start instant of the appointment.
        reservation_time: NaiveDateTime,
        /// Total service duration in minutes, summed over `services`.
        grooming_period: i64,
    },
    Boarding {
        room_type: String,
        checkin_at: NaiveDateTime,
        checkout_at: NaiveDateTime,
    },
}

impl ReservationDetail {
    pub fn kind(&self) -> ReservationKind {
        match self {
            ReservationDetail::Grooming { .. } => ReservationKind::Grooming,
            ReservationDetail::Boarding { .. } => ReservationKind::Boarding,
        }
    }
}

/// A reservation as stored and served: shared shape plus the kind payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub reservation_id: ReservationId,
    pub status: ReservationStatus,
    #[serde(flatten)]
    pub snapshot: ReservationSnapshot,
    pub pick_up_service: bool,
    pub customer_note: Option<String>,
    pub store_note: Option<String>,
    /// Computed at creation, immutable thereafter.
    pub total_price: i64,
    #[serde(flatten)]
    pub detail: ReservationDetail,
    pub created_at: String,
    pub updated_at: String,
}

impl Reservation {
    pub fn kind(&self) -> ReservationKind {
        self.detail.kind()
    }
}

/// A customer's single-use promotional coupon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    pub coupon_number: String,
    pub user_id: String,
    pub status: CouponStatus,
    /// Set when the coupon is attached at reservation-creation time.
    pub reservation_id: Option<String>,
    /// Set when the coupon is finalized at the complete transition.
    pub order_id: Option<i64>,
    pub store_name: Option<String>,
}

/// Order written at the `complete` transition, exactly once per reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: i64,
    pub reservation_id: String,
    pub user_id: String,
    pub total_price: i64,
    pub status: String,
    /// Customer risk flag, false on creation, togglable by staff.
    pub blacklist: bool,
    pub created_at: String,
}
