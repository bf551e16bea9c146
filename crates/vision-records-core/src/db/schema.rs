//! SQLite schema definition.

/// Complete database schema for vision-records.
///
/// One durable slot per key; the record collection and the login flag each
/// occupy a single row.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS slots (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

/// Slot holding the serialized record collection.
pub const RECORDS_SLOT: &str = "patientRecords";

/// Slot holding the login gate flag consumed by the shell.
pub const AUTH_SLOT: &str = "isAuthenticated";

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_slot_upsert() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        conn.execute(
            "INSERT INTO slots (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [RECORDS_SLOT, "[]"],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO slots (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [RECORDS_SLOT, "[1]"],
        )
        .unwrap();

        let value: String = conn
            .query_row("SELECT value FROM slots WHERE key = ?", [RECORDS_SLOT], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(value, "[1]");
    }
}
