// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error taxonomy shared across the Pawdesk workspace.
//!
//! Every fallible operation in the engine returns `Result<_, PawdeskError>`.
//! The variants map one-to-one onto the HTTP statuses the gateway emits:
//! `NotFound` → 404, `Validation`/`InvalidTransition`/`AmbiguousMatch` → 400,
//! `SlotConflict` → 409, everything else → 500.

use thiserror::Error;

use crate::types::{ReservationStatus, TransitionAction};

/// Unified error type for the Pawdesk booking engine.
#[derive(Debug, Error)]
pub enum PawdeskError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A referenced entity (store, customer, pet, pricing tier, reservation,
    /// order) does not exist.
    #[error("{entity} not found: {detail}")]
    NotFound {
        /// Human-readable entity name, e.g. "customer".
        entity: &'static str,
        /// Lookup context, e.g. the business key that missed.
        detail: String,
    },

    /// Request payload failed validation before any write happened.
    #[error("validation failed: {message}")]
    Validation {
        /// Field-level description of what is wrong.
        message: String,
    },

    /// The requested time window collides with existing bookings. Callers
    /// should re-query availability and pick a different window rather than
    /// blindly retrying.
    #[error("slot conflict: {detail}")]
    SlotConflict {
        /// The first conflicting marker, or the constraint that fired.
        detail: String,
    },

    /// The lifecycle action is not legal from the reservation's current
    /// state. Nothing was mutated.
    #[error("reservation {reservation_id} is {current}, cannot {attempted}")]
    InvalidTransition {
        /// The reservation the caller addressed.
        reservation_id: String,
        /// State the reservation is actually in.
        current: ReservationStatus,
        /// Action the caller attempted.
        attempted: TransitionAction,
    },

    /// A business-key lookup matched more than one record. The engine never
    /// silently picks one.
    #[error("ambiguous {entity} match: {detail}")]
    AmbiguousMatch {
        /// Entity family that matched multiply, e.g. "customer".
        entity: &'static str,
        /// The key that matched more than once.
        detail: String,
    },

    /// Underlying storage failure (SQLite, migrations, the writer thread).
    #[error("storage error")]
    Storage {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Invariant breach that indicates a bug rather than bad input.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PawdeskError {
    /// Shorthand for a `NotFound` with a formatted detail.
    pub fn not_found(entity: &'static str, detail: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            detail: detail.into(),
        }
    }

    /// Shorthand for a `Validation` error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a `SlotConflict`.
    pub fn slot_conflict(detail: impl Into<String>) -> Self {
        Self::SlotConflict {
            detail: detail.into(),
        }
    }

    /// Shorthand for an `AmbiguousMatch`.
    pub fn ambiguous(entity: &'static str, detail: impl Into<String>) -> Self {
        Self::AmbiguousMatch {
            entity,
            detail: detail.into(),
        }
    }

    /// Wrap an arbitrary storage-layer failure.
    pub fn storage(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage {
            source: Box::new(source),
        }
    }
}
