// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Boarding price computation: billed nights and tier selection.
//!
//! Boarding is billed per night at a tier rate. Tiers are declared in the
//! catalog as (duration, unit, price-per-day); the applicable tier for a
//! stay is the largest bracket that still fits inside it, so a 10-night
//! stay with day/week/month tiers books at the weekly rate.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unit a boarding pricing bracket is declared in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
    Day,
    Week,
    Month,
}

impl DurationUnit {
    /// Calendar days per unit. Months are normalized to 30 days.
    pub fn days(self) -> i64 {
        match self {
            DurationUnit::Day => 1,
            DurationUnit::Week => 7,
            DurationUnit::Month => 30,
        }
    }
}

/// One boarding pricing bracket from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardingTier {
    pub duration: i64,
    pub duration_unit: DurationUnit,
    pub price_per_day: i64,
}

impl BoardingTier {
    /// The bracket length normalized to days.
    pub fn duration_in_days(&self) -> i64 {
        self.duration * self.duration_unit.days()
    }
}

/// Nights billed for a stay: the calendar-day difference between checkout
/// and checkin, with a one-night minimum (same-day checkout still bills a
/// full night).
pub fn billed_nights(checkin: NaiveDateTime, checkout: NaiveDateTime) -> i64 {
    (checkout.date() - checkin.date()).num_days().max(1)
}

/// Pick the pricing tier for a stay of `nights`: the tier with the largest
/// bracket that fits (`duration_in_days <= nights`); if no bracket fits,
/// the smallest bracket on offer. `None` only for an empty tier list, which
/// callers treat as a missing catalog entry.
pub fn select_tier(tiers: &[BoardingTier], nights: i64) -> Option<&BoardingTier> {
    tiers
        .iter()
        .filter(|t| t.duration_in_days() <= nights)
        .max_by_key(|t| t.duration_in_days())
        .or_else(|| tiers.iter().min_by_key(|t| t.duration_in_days()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn tier(duration: i64, unit: DurationUnit, price: i64) -> BoardingTier {
        BoardingTier {
            duration,
            duration_unit: unit,
            price_per_day: price,
        }
    }

    #[test]
    fn nights_come_from_calendar_days_not_elapsed_hours() {
        // 40 elapsed hours but two calendar days apart.
        assert_eq!(billed_nights(dt(2026, 3, 1, 18, 0), dt(2026, 3, 3, 10, 0)), 2);
        // Late checkin, early checkout, one day apart.
        assert_eq!(billed_nights(dt(2026, 3, 1, 23, 0), dt(2026, 3, 2, 7, 0)), 1);
    }

    #[test]
    fn same_day_stay_bills_one_night_minimum() {
        assert_eq!(billed_nights(dt(2026, 3, 1, 10, 0), dt(2026, 3, 1, 16, 0)), 1);
    }

    #[test]
    fn largest_fitting_bracket_wins() {
        let tiers = vec![
            tier(1, DurationUnit::Day, 500),
            tier(1, DurationUnit::Week, 420),
            tier(1, DurationUnit::Month, 350),
        ];
        assert_eq!(select_tier(&tiers, 3).unwrap().price_per_day, 500);
        assert_eq!(select_tier(&tiers, 10).unwrap().price_per_day, 420);
        assert_eq!(select_tier(&tiers, 45).unwrap().price_per_day, 350);
        // Exactly at a bracket boundary the bracket applies.
        assert_eq!(select_tier(&tiers, 7).unwrap().price_per_day, 420);
    }

    #[test]
    fn smallest_bracket_is_the_fallback() {
        // Only weekly pricing on offer; a 2-night stay books at it anyway.
        let tiers = vec![tier(1, DurationUnit::Week, 420)];
        assert_eq!(select_tier(&tiers, 2).unwrap().price_per_day, 420);
    }

    #[test]
    fn empty_catalog_selects_nothing() {
        assert!(select_tier(&[], 3).is_none());
    }
}
