// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Customer, store, and pet directory operations.

use pawdesk_core::PawdeskError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{CustomerRecord, PetRecord, StoreRecord};

/// Insert or update a customer account.
pub async fn upsert_customer(db: &Database, customer: &CustomerRecord) -> Result<(), PawdeskError> {
    let customer = customer.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO customers (user_id, full_name, phone) VALUES (?1, ?2, ?3)
                 ON CONFLICT (user_id) DO UPDATE SET full_name = ?2, phone = ?3",
                params![customer.user_id, customer.full_name, customer.phone],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a customer by account ID.
pub async fn find_customer(db: &Database, user_id: &str) -> Result<Option<CustomerRecord>, PawdeskError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT user_id, full_name, phone FROM customers WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok(CustomerRecord {
                        user_id: row.get(0)?,
                        full_name: row.get(1)?,
                        phone: row.get(2)?,
                    })
                },
            );
            match result {
                Ok(customer) => Ok(Some(customer)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert or update a store.
pub async fn upsert_store(db: &Database, store: &StoreRecord) -> Result<(), PawdeskError> {
    let store = store.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO stores (store_name, phone) VALUES (?1, ?2)
                 ON CONFLICT (store_name) DO UPDATE SET phone = ?2",
                params![store.store_name, store.phone],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a store by name.
pub async fn find_store(db: &Database, store_name: &str) -> Result<Option<StoreRecord>, PawdeskError> {
    let store_name = store_name.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT store_name, phone FROM stores WHERE store_name = ?1",
                params![store_name],
                |row| {
                    Ok(StoreRecord {
                        store_name: row.get(0)?,
                        phone: row.get(1)?,
                    })
                },
            );
            match result {
                Ok(store) => Ok(Some(store)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert or update a pet under a customer account.
pub async fn upsert_pet(db: &Database, pet: &PetRecord) -> Result<(), PawdeskError> {
    let pet = pet.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO pets (user_id, pet_name, species, breed, size, fur_amount)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT (user_id, pet_name) DO UPDATE SET
                     species = ?3, breed = ?4, size = ?5, fur_amount = ?6",
                params![
                    pet.user_id,
                    pet.pet_name,
                    pet.species,
                    pet.breed,
                    pet.size,
                    pet.fur_amount,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a pet by owner account and pet name.
pub async fn find_pet(
    db: &Database,
    user_id: &str,
    pet_name: &str,
) -> Result<Option<PetRecord>, PawdeskError> {
    let user_id = user_id.to_string();
    let pet_name = pet_name.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT user_id, pet_name, species, breed, size, fur_amount
                 FROM pets WHERE user_id = ?1 AND pet_name = ?2",
                params![user_id, pet_name],
                map_pet_row,
            );
            match result {
                Ok(pet) => Ok(Some(pet)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

fn map_pet_row(row: &rusqlite::Row<'_>) -> Result<PetRecord, rusqlite::Error> {
    Ok(PetRecord {
        user_id: row.get(0)?,
        pet_name: row.get(1)?,
        species: row.get(2)?,
        breed: row.get(3)?,
        size: row.get(4)?,
        fur_amount: row.get(5)?,
    })
}

/// Customers whose snapshot identity matches `(full_name, phone)`.
///
/// The complete transition resolves the reservation snapshot back to an
/// account through this; two rows are enough to classify a match as
/// ambiguous, so the scan stops there.
pub(crate) fn identity_matches(
    conn: &rusqlite::Connection,
    full_name: &str,
    phone: &str,
) -> Result<Vec<CustomerRecord>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT user_id, full_name, phone FROM customers
         WHERE full_name = ?1 AND phone = ?2
         ORDER BY user_id ASC LIMIT 2",
    )?;
    let rows = stmt.query_map(params![full_name, phone], |row| {
        Ok(CustomerRecord {
            user_id: row.get(0)?,
            full_name: row.get(1)?,
            phone: row.get(2)?,
        })
    })?;
    let mut matches = Vec::new();
    for row in rows {
        matches.push(row?);
    }
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn customer(user_id: &str, name: &str, phone: &str) -> CustomerRecord {
        CustomerRecord {
            user_id: user_id.to_string(),
            full_name: name.to_string(),
            phone: phone.to_string(),
        }
    }

    #[tokio::test]
    async fn upsert_and_find_customer_roundtrips() {
        let (db, _dir) = setup_db().await;
        upsert_customer(&db, &customer("u1", "Lin Wei", "0912000111"))
            .await
            .unwrap();

        let found = find_customer(&db, "u1").await.unwrap().unwrap();
        assert_eq!(found.full_name, "Lin Wei");

        // Upsert with the same ID updates in place.
        upsert_customer(&db, &customer("u1", "Lin Wei", "0988777666"))
            .await
            .unwrap();
        let found = find_customer(&db, "u1").await.unwrap().unwrap();
        assert_eq!(found.phone, "0988777666");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn find_missing_rows_return_none() {
        let (db, _dir) = setup_db().await;
        assert!(find_customer(&db, "ghost").await.unwrap().is_none());
        assert!(find_store(&db, "ghost").await.unwrap().is_none());
        assert!(find_pet(&db, "ghost", "Rex").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn pet_lookup_is_scoped_to_owner() {
        let (db, _dir) = setup_db().await;
        let pet = PetRecord {
            user_id: "u1".into(),
            pet_name: "Mochi".into(),
            species: "dog".into(),
            breed: "corgi".into(),
            size: "medium".into(),
            fur_amount: "normal".into(),
        };
        upsert_pet(&db, &pet).await.unwrap();

        assert!(find_pet(&db, "u1", "Mochi").await.unwrap().is_some());
        assert!(find_pet(&db, "u2", "Mochi").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn identity_matches_classifies_duplicates() {
        let (db, _dir) = setup_db().await;
        upsert_customer(&db, &customer("u1", "Lin Wei", "0912000111"))
            .await
            .unwrap();
        upsert_customer(&db, &customer("u2", "Lin Wei", "0912000111"))
            .await
            .unwrap();
        upsert_customer(&db, &customer("u3", "Chen Yu", "0955123123"))
            .await
            .unwrap();

        let matches = db
            .connection()
            .call(|conn| {
                let unique = identity_matches(conn, "Chen Yu", "0955123123")?;
                let dupes = identity_matches(conn, "Lin Wei", "0912000111")?;
                let none = identity_matches(conn, "Lin Wei", "0000000000")?;
                Ok((unique, dupes, none))
            })
            .await
            .unwrap();

        assert_eq!(matches.0.len(), 1);
        assert_eq!(matches.0[0].user_id, "u3");
        assert_eq!(matches.1.len(), 2);
        assert!(matches.2.is_empty());
        db.close().await.unwrap();
    }
}
