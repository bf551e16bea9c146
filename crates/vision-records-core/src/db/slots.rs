//! Slot read/write operations.

use rusqlite::OptionalExtension;

use super::{Database, DbResult, AUTH_SLOT, RECORDS_SLOT};
use crate::models::PatientRecord;

/// Result of loading the record slot.
///
/// A corrupt slot never fails the open: the collection degrades to empty and
/// `load_failed` tells the shell to surface a warning.
#[derive(Debug, Default)]
pub struct LoadedRecords {
    pub records: Vec<PatientRecord>,
    pub load_failed: bool,
}

impl Database {
    /// Read a raw slot value.
    pub fn read_slot(&self, key: &str) -> DbResult<Option<String>> {
        self.conn
            .query_row("SELECT value FROM slots WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(Into::into)
    }

    /// Write a raw slot value (upsert).
    pub fn write_slot(&self, key: &str, value: &str) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO slots (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            [key, value],
        )?;
        Ok(())
    }

    /// Load the full record collection from its slot.
    pub fn load_records(&self) -> DbResult<LoadedRecords> {
        match self.read_slot(RECORDS_SLOT)? {
            None => Ok(LoadedRecords::default()),
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(records) => Ok(LoadedRecords {
                    records,
                    load_failed: false,
                }),
                // Corrupt slot: start empty, let the caller warn
                Err(_) => Ok(LoadedRecords {
                    records: Vec::new(),
                    load_failed: true,
                }),
            },
        }
    }

    /// Persist the full record collection to its slot.
    pub fn save_records(&self, records: &[PatientRecord]) -> DbResult<()> {
        let raw = serde_json::to_string(records)?;
        self.write_slot(RECORDS_SLOT, &raw)
    }

    /// Read the login gate flag.
    pub fn is_authenticated(&self) -> DbResult<bool> {
        Ok(self.read_slot(AUTH_SLOT)?.as_deref() == Some("true"))
    }

    /// Write the login gate flag.
    pub fn set_authenticated(&self, authenticated: bool) -> DbResult<()> {
        self.write_slot(AUTH_SLOT, if authenticated { "true" } else { "false" })
    }
}
