/// Schema versioning for the SQLite store
///
/// Migrations are applied in order inside one transaction, and the highest
/// applied version is recorded in `schema_version`.

use rusqlite::{Connection, OptionalExtension};
use crate::storage::StorageError;

/// (version, description, SQL) in ascending version order
const MIGRATIONS: &[(i32, &str, &str)] = &[(
    1,
    "kv_store table holding one serialized collection per key",
    "CREATE TABLE IF NOT EXISTS kv_store (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );",
)];

fn latest_version() -> i32 {
    MIGRATIONS.last().map(|(version, _, _)| *version).unwrap_or(0)
}

/// Bring the schema up to the latest version
///
/// Refuses files written by a newer build rather than guessing at their layout.
pub fn initialize_database(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);")?;

    let found = schema_version(conn)?;
    let latest = latest_version();
    if found > latest {
        return Err(StorageError::Migration(format!(
            "database schema version {} is newer than supported version {}",
            found, latest
        )));
    }
    if found == latest {
        return Ok(());
    }

    let tx = conn.unchecked_transaction()?;
    for (version, description, sql) in MIGRATIONS.iter().filter(|(v, _, _)| *v > found) {
        tx.execute_batch(sql)
            .map_err(|e| StorageError::Migration(format!("migration v{} failed: {}", version, e)))?;
        tracing::info!("Applied migration v{}: {}", version, description);
    }
    tx.execute("DELETE FROM schema_version", [])?;
    tx.execute("INSERT INTO schema_version (version) VALUES (?1)", [latest])?;
    tx.commit()?;

    Ok(())
}

/// Recorded schema version, 0 for a fresh file
fn schema_version(conn: &Connection) -> Result<i32, StorageError> {
    let version = conn
        .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get::<_, Option<i32>>(0))
        .optional()?
        .flatten();
    Ok(version.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get::<_, i32>(0),
        )
        .unwrap()
            == 1
    }

    #[test]
    fn test_fresh_database_is_migrated() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_database(&conn).unwrap();
        assert!(table_exists(&conn, "kv_store"));
        assert_eq!(schema_version(&conn).unwrap(), latest_version());

        // Running again is a no-op
        initialize_database(&conn).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), latest_version());
    }

    #[test]
    fn test_newer_schema_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_database(&conn).unwrap();
        conn.execute("UPDATE schema_version SET version = ?1", [latest_version() + 1])
            .unwrap();

        assert!(matches!(initialize_database(&conn), Err(StorageError::Migration(_))));
    }
}
