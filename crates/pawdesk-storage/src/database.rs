// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The shared SQLite handle: open with PRAGMAs and migrations, close on
//! shutdown.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes; the
//! booking transactions rely on that serialization.

use std::time::Duration;

use pawdesk_core::PawdeskError;

/// Handle to the SQLite database.
///
/// Cheap to clone; all clones share the same underlying connection and
/// its writer thread.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs, and run
    /// pending migrations.
    pub async fn open(path: &str) -> Result<Self, PawdeskError> {
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(map_tr_err)?;

        conn.call(|conn| {
            conn.pragma_update(None, "journal_mode", "WAL")?;
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.busy_timeout(Duration::from_secs(5))?;
            crate::migrations::run_migrations(conn).map_err(abort)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        tracing::debug!(path, "database opened");
        Ok(Self { conn })
    }

    /// The shared async connection. Callers compose queries via `call`.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Row counts for every table the schema owns, in schema order.
    pub async fn table_counts(&self) -> Result<Vec<(&'static str, i64)>, PawdeskError> {
        const TABLES: [&str; 11] = [
            "stores",
            "customers",
            "pets",
            "grooming_pricing",
            "room_types",
            "boarding_pricing",
            "reservations",
            "grooming_slots",
            "boarding_slots",
            "coupons",
            "orders",
        ];
        self.conn
            .call(|conn| {
                let mut counts = Vec::with_capacity(TABLES.len());
                for table in TABLES {
                    let rows: i64 = conn.query_row(
                        &format!("SELECT COUNT(*) FROM {table}"),
                        [],
                        |row| row.get(0),
                    )?;
                    counts.push((table, rows));
                }
                Ok(counts)
            })
            .await
            .map_err(map_tr_err)
    }

    /// Flush and close the underlying connection.
    pub async fn close(self) -> Result<(), PawdeskError> {
        self.conn.close().await.map_err(map_tr_err)
    }
}

/// Convert a tokio-rusqlite error into a domain error.
///
/// Domain errors raised inside `call` closures travel through the
/// `Other` variant (see [`abort`]) and are unwrapped here; everything
/// else becomes a `Storage` error.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error) -> PawdeskError {
    match e {
        tokio_rusqlite::Error::Rusqlite(e) => PawdeskError::Storage {
            source: Box::new(e),
        },
        tokio_rusqlite::Error::Other(inner) => match inner.downcast::<PawdeskError>() {
            Ok(domain) => *domain,
            Err(other) => PawdeskError::Storage { source: other },
        },
        other => PawdeskError::Storage {
            source: Box::new(other),
        },
    }
}

/// Wrap a domain error so it can abort a `call` closure and be recovered
/// by [`map_tr_err`] on the other side.
pub(crate) fn abort(err: PawdeskError) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Other(Box::new(err))
}

/// True when the error is a UNIQUE or PRIMARY KEY constraint violation.
pub(crate) fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
