// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound request shapes for the reservation engine.
//!
//! The create request is tagged by `kind`, so callers post one payload
//! shape and the engine dispatches; everything kind-specific lives in the
//! variant. Window parameters are explicit instants, never spread over
//! loose date/hour fields.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Payload for creating a reservation of either kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CreateReservationRequest {
    Grooming(GroomingRequest),
    Boarding(BoardingRequest),
}

/// A grooming appointment request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroomingRequest {
    pub store_name: String,
    pub user_id: String,
    pub pet_name: String,
    /// Booked service titles; must not be empty.
    pub services: Vec<String>,
    /// Appointment start.
    pub reservation_time: NaiveDateTime,
    #[serde(default)]
    pub pick_up_service: bool,
    #[serde(default)]
    pub customer_note: Option<String>,
    /// Attach the customer's promotional coupon if they hold an unspent one.
    #[serde(default)]
    pub use_coupon: bool,
}

/// A boarding stay request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardingRequest {
    pub store_name: String,
    pub user_id: String,
    pub pet_name: String,
    pub room_type: String,
    pub checkin_at: NaiveDateTime,
    pub checkout_at: NaiveDateTime,
    #[serde(default)]
    pub pick_up_service: bool,
    #[serde(default)]
    pub customer_note: Option<String>,
}

/// Which listing a staff dashboard is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListStatus {
    /// Awaiting staff review, newest first.
    Pending,
    /// Accepted and upcoming, soonest service first.
    Confirmed,
    /// Finished or cancelled, most recently settled first.
    History,
}
