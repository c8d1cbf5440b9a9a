// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pawdesk seed` command implementation.
//!
//! Loads a TOML catalog of stores, customers, pets, pricing, room types,
//! and coupons into the database. Every record is an upsert keyed by its
//! natural key, so re-running the same file is harmless.

use std::path::Path;

use pawdesk_config::PawdeskConfig;
use pawdesk_core::PawdeskError;
use pawdesk_storage::Database;
use pawdesk_storage::models::{
    BoardingTierRecord, CustomerRecord, GroomingPriceRecord, PetRecord, RoomTypeRecord,
    StoreRecord,
};
use pawdesk_storage::queries::{coupons, directory, pricing};
use serde::Deserialize;
use uuid::Uuid;

/// A seed catalog as parsed from TOML.
///
/// All sections are optional; unknown keys are rejected so a misspelled
/// section never silently loads nothing.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedFile {
    #[serde(default)]
    pub stores: Vec<StoreRecord>,
    #[serde(default)]
    pub customers: Vec<CustomerRecord>,
    #[serde(default)]
    pub pets: Vec<PetRecord>,
    #[serde(default)]
    pub grooming_pricing: Vec<GroomingPriceRecord>,
    #[serde(default)]
    pub room_types: Vec<RoomTypeRecord>,
    #[serde(default)]
    pub boarding_pricing: Vec<BoardingTierRecord>,
    #[serde(default)]
    pub coupons: Vec<SeedCoupon>,
}

/// A coupon grant in the seed catalog.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedCoupon {
    pub user_id: String,
    /// Generated when omitted.
    pub coupon_number: Option<String>,
}

/// Run the `pawdesk seed` command.
pub async fn run_seed(config: &PawdeskConfig, file: &Path) -> Result<(), PawdeskError> {
    let content = std::fs::read_to_string(file).map_err(|e| {
        PawdeskError::Config(format!("cannot read seed file {}: {e}", file.display()))
    })?;
    let seed: SeedFile = toml::from_str(&content).map_err(|e| {
        PawdeskError::Config(format!("invalid seed file {}: {e}", file.display()))
    })?;

    let db = Database::open(&config.storage.database_path).await?;
    apply(&db, &seed).await?;
    db.close().await?;

    println!(
        "seeded {} stores, {} customers, {} pets, {} grooming prices, \
         {} room types, {} boarding tiers, {} coupons",
        seed.stores.len(),
        seed.customers.len(),
        seed.pets.len(),
        seed.grooming_pricing.len(),
        seed.room_types.len(),
        seed.boarding_pricing.len(),
        seed.coupons.len(),
    );
    Ok(())
}

/// Upsert every record in the catalog.
pub async fn apply(db: &Database, seed: &SeedFile) -> Result<(), PawdeskError> {
    for store in &seed.stores {
        directory::upsert_store(db, store).await?;
    }
    for customer in &seed.customers {
        directory::upsert_customer(db, customer).await?;
    }
    for pet in &seed.pets {
        directory::upsert_pet(db, pet).await?;
    }
    for price in &seed.grooming_pricing {
        pricing::upsert_grooming_price(db, price).await?;
    }
    for room in &seed.room_types {
        pricing::upsert_room_type(db, room).await?;
    }
    for tier in &seed.boarding_pricing {
        pricing::upsert_boarding_tier(db, tier).await?;
    }
    for coupon in &seed.coupons {
        let number = coupon
            .coupon_number
            .clone()
            .unwrap_or_else(|| format!("CPN-{}", Uuid::new_v4().simple()));
        coupons::issue(db, &number, &coupon.user_id).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CATALOG: &str = r#"
[[stores]]
store_name = "Happy Paws"
phone = "02-2712-3456"

[[customers]]
user_id = "u-lin"
full_name = "Lin Wei"
phone = "0912000111"

[[pets]]
user_id = "u-lin"
pet_name = "Mochi"
species = "dog"
breed = "corgi"
size = "medium"
fur_amount = "short"

[[grooming_pricing]]
store_name = "Happy Paws"
service_title = "Bath"
pet_size = "medium"
fur_amount = "short"
price = 600
duration_minutes = 45

[[room_types]]
store_name = "Happy Paws"
room_type = "standard"
species = "dog"
room_count = 2

[[boarding_pricing]]
store_name = "Happy Paws"
room_type = "standard"
duration = 1
duration_unit = "day"
price_per_day = 500

[[coupons]]
user_id = "u-lin"
coupon_number = "CPN-42"
"#;

    #[test]
    fn catalog_parses_with_defaults() {
        let seed: SeedFile = toml::from_str(CATALOG).unwrap();
        assert_eq!(seed.stores.len(), 1);
        assert_eq!(seed.pets.len(), 1);
        // pet_capacity falls back to one room, one pet
        assert_eq!(seed.room_types[0].pet_capacity, 1);
        assert_eq!(seed.coupons[0].coupon_number.as_deref(), Some("CPN-42"));
    }

    #[test]
    fn unknown_sections_are_rejected() {
        let result: Result<SeedFile, _> = toml::from_str("[[storess]]\nstore_name = \"x\"\n");
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn apply_is_idempotent() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("seed.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        let seed: SeedFile = toml::from_str(CATALOG).unwrap();

        apply(&db, &seed).await.unwrap();
        let first = db.table_counts().await.unwrap();

        apply(&db, &seed).await.unwrap();
        let second = db.table_counts().await.unwrap();
        assert_eq!(first, second);

        let store = directory::find_store(&db, "Happy Paws").await.unwrap();
        assert!(store.is_some());
        let coupon = coupons::find_for_user(&db, "u-lin").await.unwrap().unwrap();
        assert_eq!(coupon.coupon_number, "CPN-42");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn omitted_coupon_numbers_are_generated() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("seed.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();

        let seed = SeedFile {
            customers: vec![CustomerRecord {
                user_id: "u-gen".into(),
                full_name: "Gen User".into(),
                phone: "0911222333".into(),
            }],
            coupons: vec![SeedCoupon {
                user_id: "u-gen".into(),
                coupon_number: None,
            }],
            ..SeedFile::default()
        };
        apply(&db, &seed).await.unwrap();

        let coupon = coupons::find_for_user(&db, "u-gen").await.unwrap().unwrap();
        assert!(coupon.coupon_number.starts_with("CPN-"));
        assert!(coupon.coupon_number.len() > 8);

        db.close().await.unwrap();
    }
}
