//! Vision-Records Core Library
//!
//! Local-first patient vision-record manager for a single-clinician
//! optometry practice.
//!
//! # Architecture
//!
//! ```text
//!                    UI shell (forms, camera, toasts)
//!                                  │ FFI
//!                    ┌─────────────▼─────────────┐
//!                    │        RecordStore        │
//!                    │  CRUD · uniqueness · search│
//!                    └──────┬─────────────┬──────┘
//!                           │             │
//!              write-through│             │batch append
//!                    ┌──────▼──────┐ ┌────▼─────────┐
//!                    │  Database   │ │  Reconciler  │
//!                    │ slot (JSON) │ │ accept/reject│
//!                    └─────────────┘ └────▲─────────┘
//!                                         │ candidates
//!                                  ┌──────┴───────┐
//!                                  │ Spreadsheet  │
//!                                  │ CSV / XLSX   │
//!                                  └──────────────┘
//! ```
//!
//! # Core Principle
//!
//! **No two records share a non-empty mobile number.** Single-record
//! mutations are all-or-nothing; bulk import is partial-success, dropping
//! and counting bad rows instead of failing the batch.
//!
//! # Modules
//!
//! - [`models`]: Domain types (PatientRecord, EyeMeasurement, RecordDraft)
//! - [`db`]: SQLite-backed durable slot persistence
//! - [`store`]: The authoritative record collection
//! - [`spreadsheet`]: Tabular export/import codec
//! - [`reconcile`]: Uniqueness policy for imported batches

pub mod db;
pub mod models;
pub mod reconcile;
pub mod spreadsheet;
pub mod store;

// Re-export commonly used types
pub use db::Database;
pub use models::{EyeMeasurement, PatientRecord, RecordDraft};
pub use reconcile::{reconcile, ImportSummary, ReconcileOutcome};
pub use store::{RecordStore, StoreError};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum VisionRecordsError {
    #[error("Duplicate mobile number: {0}")]
    DuplicateMobile(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Import failed: {0}")]
    ImportFailed(String),
}

impl From<store::StoreError> for VisionRecordsError {
    fn from(e: store::StoreError) -> Self {
        match e {
            store::StoreError::DuplicateMobile(mobile) => {
                VisionRecordsError::DuplicateMobile(mobile)
            }
            store::StoreError::NotFound(id) => VisionRecordsError::NotFound(id),
            store::StoreError::Db(err) => VisionRecordsError::StorageError(err.to_string()),
        }
    }
}

impl From<db::DbError> for VisionRecordsError {
    fn from(e: db::DbError) -> Self {
        VisionRecordsError::StorageError(e.to_string())
    }
}

impl From<spreadsheet::ImportError> for VisionRecordsError {
    fn from(e: spreadsheet::ImportError) -> Self {
        VisionRecordsError::ImportFailed(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for VisionRecordsError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        VisionRecordsError::StorageError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a record store at the given path.
#[uniffi::export]
pub fn open_store(path: String) -> Result<Arc<VisionRecordsCore>, VisionRecordsError> {
    let store = RecordStore::open(&path)?;
    Ok(Arc::new(VisionRecordsCore {
        store: Arc::new(Mutex::new(store)),
    }))
}

/// Create an in-memory record store (for testing).
#[uniffi::export]
pub fn open_store_in_memory() -> Result<Arc<VisionRecordsCore>, VisionRecordsError> {
    let store = RecordStore::open_in_memory()?;
    Ok(Arc::new(VisionRecordsCore {
        store: Arc::new(Mutex::new(store)),
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe store wrapper for FFI. The mutex serializes every operation,
/// imports included, so there is no overlapping-mutation path.
#[derive(uniffi::Object)]
pub struct VisionRecordsCore {
    store: Arc<Mutex<RecordStore>>,
}

#[uniffi::export]
impl VisionRecordsCore {
    // =========================================================================
    // Record Operations
    // =========================================================================

    /// Add a record, returning its minted ID.
    pub fn add_record(&self, draft: FfiRecordDraft) -> Result<String, VisionRecordsError> {
        let mut store = self.store.lock()?;
        Ok(store.add(draft.into())?)
    }

    /// Update the record with the given ID in place.
    pub fn update_record(
        &self,
        id: String,
        draft: FfiRecordDraft,
    ) -> Result<(), VisionRecordsError> {
        let mut store = self.store.lock()?;
        store.update(&id, draft.into())?;
        Ok(())
    }

    /// Delete the record with the given ID.
    pub fn delete_record(&self, id: String) -> Result<(), VisionRecordsError> {
        let mut store = self.store.lock()?;
        store.delete(&id)?;
        Ok(())
    }

    /// Look up a record by ID.
    pub fn get_record(&self, id: String) -> Result<Option<FfiPatientRecord>, VisionRecordsError> {
        let store = self.store.lock()?;
        Ok(store.get_by_id(&id).map(|record| record.clone().into()))
    }

    /// Search by patient name or mobile number; an empty query lists all.
    pub fn search_records(
        &self,
        query: String,
    ) -> Result<Vec<FfiPatientRecord>, VisionRecordsError> {
        let store = self.store.lock()?;
        Ok(store
            .search(&query)
            .into_iter()
            .map(|record| record.clone().into())
            .collect())
    }

    /// All records in store order.
    pub fn list_records(&self) -> Result<Vec<FfiPatientRecord>, VisionRecordsError> {
        let store = self.store.lock()?;
        Ok(store
            .records()
            .iter()
            .map(|record| record.clone().into())
            .collect())
    }

    /// Number of records held.
    pub fn record_count(&self) -> Result<u32, VisionRecordsError> {
        let store = self.store.lock()?;
        Ok(store.len() as u32)
    }

    /// True when the persisted state was unreadable at open and the store
    /// started empty; the shell shows a warning toast.
    pub fn had_load_failure(&self) -> Result<bool, VisionRecordsError> {
        let store = self.store.lock()?;
        Ok(store.load_failed())
    }

    // =========================================================================
    // Import / Export
    // =========================================================================

    /// Export the collection as CSV text.
    pub fn export_csv(&self) -> Result<String, VisionRecordsError> {
        let store = self.store.lock()?;
        Ok(spreadsheet::to_csv(store.records()))
    }

    /// Suggested file name for today's export.
    pub fn export_file_name(&self) -> String {
        spreadsheet::export_file_name_today()
    }

    /// Import a spreadsheet file, merging its rows into the collection.
    /// Returns accepted/rejected counts; a malformed document fails with no
    /// records added.
    pub fn import_from_file(&self, path: String) -> Result<FfiImportSummary, VisionRecordsError> {
        let candidates = spreadsheet::read_candidates(std::path::Path::new(&path))?;
        let mut store = self.store.lock()?;
        let summary = store.import_candidates(candidates)?;
        Ok(summary.into())
    }

    // =========================================================================
    // Login Gate Flag
    // =========================================================================

    /// Read the login gate flag the shell's auth gate consumes.
    pub fn is_authenticated(&self) -> Result<bool, VisionRecordsError> {
        let store = self.store.lock()?;
        Ok(store.is_authenticated()?)
    }

    /// Write the login gate flag.
    pub fn set_authenticated(&self, authenticated: bool) -> Result<(), VisionRecordsError> {
        let store = self.store.lock()?;
        store.set_authenticated(authenticated)?;
        Ok(())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe eye measurement.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiEyeMeasurement {
    pub sphere: String,
    pub cylinder: String,
    pub axis: String,
    pub add: String,
}

impl From<EyeMeasurement> for FfiEyeMeasurement {
    fn from(eye: EyeMeasurement) -> Self {
        Self {
            sphere: eye.sphere,
            cylinder: eye.cylinder,
            axis: eye.axis,
            add: eye.add,
        }
    }
}

impl From<FfiEyeMeasurement> for EyeMeasurement {
    fn from(eye: FfiEyeMeasurement) -> Self {
        EyeMeasurement {
            sphere: eye.sphere,
            cylinder: eye.cylinder,
            axis: eye.axis,
            add: eye.add,
        }
    }
}

/// FFI-safe record draft (add/update payload).
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRecordDraft {
    pub date: String,
    pub patient_name: String,
    pub mobile_number: String,
    pub right_eye: FfiEyeMeasurement,
    pub left_eye: FfiEyeMeasurement,
    pub frame_price: String,
    pub glass_price: String,
    pub remarks: String,
    pub prescription_image: Option<String>,
}

impl From<FfiRecordDraft> for RecordDraft {
    fn from(draft: FfiRecordDraft) -> Self {
        RecordDraft {
            date: draft.date,
            patient_name: draft.patient_name,
            mobile_number: draft.mobile_number,
            right_eye: draft.right_eye.into(),
            left_eye: draft.left_eye.into(),
            frame_price: draft.frame_price,
            glass_price: draft.glass_price,
            remarks: draft.remarks,
            prescription_image: draft.prescription_image,
        }
    }
}

/// FFI-safe patient record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientRecord {
    pub id: String,
    pub date: String,
    pub patient_name: String,
    pub mobile_number: String,
    pub right_eye: FfiEyeMeasurement,
    pub left_eye: FfiEyeMeasurement,
    pub frame_price: String,
    pub glass_price: String,
    pub remarks: String,
    pub prescription_image: Option<String>,
}

impl From<PatientRecord> for FfiPatientRecord {
    fn from(record: PatientRecord) -> Self {
        Self {
            id: record.id,
            date: record.date,
            patient_name: record.patient_name,
            mobile_number: record.mobile_number,
            right_eye: record.right_eye.into(),
            left_eye: record.left_eye.into(),
            frame_price: record.frame_price,
            glass_price: record.glass_price,
            remarks: record.remarks,
            prescription_image: record.prescription_image,
        }
    }
}

/// FFI-safe import summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiImportSummary {
    pub accepted: u32,
    pub rejected: u32,
}

impl From<ImportSummary> for FfiImportSummary {
    fn from(summary: ImportSummary) -> Self {
        Self {
            accepted: summary.accepted as u32,
            rejected: summary.rejected as u32,
        }
    }
}
