//! The record store: the authoritative in-memory collection.
//!
//! Every mutation enforces the mobile-number uniqueness invariant and then
//! writes the whole collection through to the durable slot before
//! returning. A failed write rolls the in-memory change back, so either the
//! full mutation plus persistence lands or nothing does.

use thiserror::Error;

use crate::db::{Database, DbError};
use crate::models::{PatientRecord, RecordDraft};
use crate::reconcile::{reconcile, ImportSummary};

/// Record store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("A record with mobile number {0} already exists")]
    DuplicateMobile(String),

    #[error("No record found with id {0}")]
    NotFound(String),

    #[error(transparent)]
    Db(#[from] DbError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Owns the record collection and its persistence.
pub struct RecordStore {
    db: Database,
    records: Vec<PatientRecord>,
    load_failed: bool,
}

impl RecordStore {
    /// Open the store backed by a database file, loading any prior state.
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> StoreResult<Self> {
        Self::from_db(Database::open(path)?)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_db(Database::open_in_memory()?)
    }

    fn from_db(db: Database) -> StoreResult<Self> {
        let loaded = db.load_records()?;
        Ok(Self {
            db,
            records: loaded.records,
            load_failed: loaded.load_failed,
        })
    }

    /// True when the persisted slot was unreadable and the store started
    /// empty; the shell surfaces this as a warning.
    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    /// All records in store order.
    pub fn records(&self) -> &[PatientRecord] {
        &self.records
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by ID. No side effects.
    pub fn get_by_id(&self, id: &str) -> Option<&PatientRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Search by patient name (case-insensitive substring) or mobile number
    /// (raw substring). An empty or whitespace query returns everything, in
    /// store order.
    pub fn search(&self, query: &str) -> Vec<&PatientRecord> {
        let lower_query = query.trim().to_lowercase();
        if lower_query.is_empty() {
            return self.records.iter().collect();
        }
        self.records
            .iter()
            .filter(|record| record.matches(&lower_query))
            .collect()
    }

    /// Add a new record, minting its ID. Rejects a duplicate mobile number.
    pub fn add(&mut self, draft: RecordDraft) -> StoreResult<String> {
        if self.mobile_taken(&draft.mobile_number, None) {
            return Err(StoreError::DuplicateMobile(draft.mobile_number));
        }

        let record = PatientRecord::from_draft(draft);
        let id = record.id.clone();
        self.records.push(record);
        if let Err(err) = self.db.save_records(&self.records) {
            self.records.pop();
            return Err(err.into());
        }
        Ok(id)
    }

    /// Replace the record with the given ID in place, preserving its
    /// position and identity. Rejects a mobile number held by another record.
    pub fn update(&mut self, id: &str, draft: RecordDraft) -> StoreResult<()> {
        if self.mobile_taken(&draft.mobile_number, Some(id)) {
            return Err(StoreError::DuplicateMobile(draft.mobile_number));
        }

        let position = self
            .position_of(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let previous = self.records[position].clone();
        self.records[position].apply_draft(draft);
        if let Err(err) = self.db.save_records(&self.records) {
            self.records[position] = previous;
            return Err(err.into());
        }
        Ok(())
    }

    /// Remove the record with the given ID.
    pub fn delete(&mut self, id: &str) -> StoreResult<()> {
        let position = self
            .position_of(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let removed = self.records.remove(position);
        if let Err(err) = self.db.save_records(&self.records) {
            self.records.insert(position, removed);
            return Err(err.into());
        }
        Ok(())
    }

    /// Merge a batch of imported candidates into the collection.
    ///
    /// Reconciliation enforces uniqueness for the whole batch up front, so
    /// the accepted records are appended without per-record checks and the
    /// collection is persisted once.
    pub fn import_candidates(
        &mut self,
        candidates: Vec<PatientRecord>,
    ) -> StoreResult<ImportSummary> {
        let outcome = reconcile(candidates, &self.records);
        let summary = ImportSummary {
            accepted: outcome.accepted_count(),
            rejected: outcome.rejected_count,
        };
        if outcome.accepted.is_empty() {
            return Ok(summary);
        }

        let before = self.records.len();
        self.records.extend(outcome.accepted);
        if let Err(err) = self.db.save_records(&self.records) {
            self.records.truncate(before);
            return Err(err.into());
        }
        Ok(summary)
    }

    /// Read the login gate flag from the durable slot.
    pub fn is_authenticated(&self) -> StoreResult<bool> {
        Ok(self.db.is_authenticated()?)
    }

    /// Write the login gate flag.
    pub fn set_authenticated(&self, authenticated: bool) -> StoreResult<()> {
        Ok(self.db.set_authenticated(authenticated)?)
    }

    /// True when another record (excluding `exclude_id`) already holds this
    /// non-empty mobile number.
    fn mobile_taken(&self, mobile: &str, exclude_id: Option<&str>) -> bool {
        if mobile.is_empty() {
            return false;
        }
        self.records.iter().any(|record| {
            record.mobile_number == mobile && exclude_id != Some(record.id.as_str())
        })
    }

    fn position_of(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }
}
