// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slot quantization: turning a requested window into discrete capacity
//! markers.
//!
//! Grooming works in 15-minute slots, boarding in 30-minute slots. The
//! rounding policy for grooming is **ceiling**: a service occupies every
//! quarter-hour it touches, so 45 minutes from 10:00 yields markers
//! 10:00/10:15/10:30 and 100 minutes yields 7 markers. Both quantizers are
//! pure functions; the same input always yields the same marker sequence.

use chrono::{Duration, NaiveDateTime};

/// Grooming calendar granularity in minutes.
pub const GROOMING_SLOT_MINUTES: i64 = 15;

/// Boarding calendar granularity in minutes.
pub const BOARDING_SLOT_MINUTES: i64 = 30;

/// Number of 15-minute slots a grooming service of `duration_minutes`
/// occupies. Ceiling division, minimum one slot.
pub fn grooming_slot_count(duration_minutes: i64) -> i64 {
    if duration_minutes <= GROOMING_SLOT_MINUTES {
        return 1;
    }
    // `i64::div_ceil` is still unstable (int_roundings); operands here are
    // positive, so plain ceiling division is identical.
    (duration_minutes + GROOMING_SLOT_MINUTES - 1) / GROOMING_SLOT_MINUTES
}

/// The ordered markers a grooming appointment occupies, starting at
/// `start` and stepping by 15 minutes. Markers may cross midnight; each
/// carries its own date.
pub fn grooming_markers(start: NaiveDateTime, duration_minutes: i64) -> Vec<NaiveDateTime> {
    let count = grooming_slot_count(duration_minutes);
    (0..count)
        .map(|i| start + Duration::minutes(GROOMING_SLOT_MINUTES * i))
        .collect()
}

/// The ordered markers a boarding stay occupies: every 30-minute boundary
/// from `checkin` (inclusive) up to but excluding `checkout`.
///
/// Returns an empty sequence when `checkout <= checkin`; callers validate
/// the window before quantizing.
pub fn boarding_markers(checkin: NaiveDateTime, checkout: NaiveDateTime) -> Vec<NaiveDateTime> {
    let mut markers = Vec::new();
    let mut t = checkin;
    while t < checkout {
        markers.push(t);
        t += Duration::minutes(BOARDING_SLOT_MINUTES);
    }
    markers
}
