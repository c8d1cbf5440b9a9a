// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-side composites the engine serves to staff dashboards.

use chrono::NaiveDate;
use pawdesk_core::types::{Order, Reservation};
use pawdesk_storage::models::RoomOccupancy;
use serde::{Deserialize, Serialize};

/// Occupied grooming times at a store on one day. Anything not listed is
/// bookable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroomingAvailability {
    pub store_name: String,
    pub date: NaiveDate,
    /// Quantized HH:MM markers already claimed, sorted.
    pub occupied: Vec<String>,
}

/// Per-room-type boarding occupancy at a store on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardingAvailability {
    pub store_name: String,
    pub date: NaiveDate,
    pub rooms: Vec<RoomOccupancy>,
}

/// Everything the staff detail page shows for one reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationDetails {
    pub reservation: Reservation,
    /// Present once the reservation was completed.
    pub order: Option<Order>,
    /// The same customer's previous finished visits at this store.
    pub customer_history: Vec<Reservation>,
}
