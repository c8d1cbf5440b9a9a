// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for the directory, catalog, and booking entities.

pub mod coupons;
pub mod directory;
pub mod orders;
pub mod pricing;
pub mod reservations;
pub mod slots;
