// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Booking orchestration for the pawdesk scheduler.
//!
//! This crate sits between the HTTP gateway and the storage layer. It
//! resolves directory records, computes prices from the catalog, and
//! hands fully-priced reservations to the storage transactions that
//! claim slots. Read-side views (availability, listings, detail pages)
//! live here too.

pub mod engine;
pub mod requests;
pub mod views;

pub use engine::Engine;
pub use requests::{BoardingRequest, CreateReservationRequest, GroomingRequest, ListStatus};
pub use views::{BoardingAvailability, GroomingAvailability, ReservationDetails};
