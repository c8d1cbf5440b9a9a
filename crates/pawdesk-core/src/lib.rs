// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Pawdesk booking engine.
//!
//! This crate holds the pure domain layer shared by the whole workspace:
//! the reservation sum type and lifecycle state machine, slot quantization,
//! boarding price selection, and the unified error taxonomy. There is no
//! I/O here; everything is deterministic and unit-testable in isolation.

pub mod error;
pub mod pricing;
pub mod schedule;
pub mod types;

// The names the rest of the workspace imports constantly.
pub use error::PawdeskError;
pub use types::{
    Coupon, CouponStatus, Order, Reservation, ReservationDetail, ReservationId, ReservationKind,
    ReservationSnapshot, ReservationStatus, TransitionAction, COUPON_POOL_SIZE,
};
