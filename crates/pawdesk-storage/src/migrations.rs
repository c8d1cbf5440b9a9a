// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schema migrations, compiled in with refinery's `embed_migrations!` and
//! applied on every database open.

use pawdesk_core::PawdeskError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Apply whatever migrations the database has not seen yet. Refinery keeps
/// its bookkeeping in `refinery_schema_history`, so reopening an up-to-date
/// database is a no-op.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), PawdeskError> {
    embedded::migrations::runner()
        .run(conn)
        .map_err(|e| PawdeskError::Storage {
            source: Box::new(e),
        })?;
    Ok(())
}
