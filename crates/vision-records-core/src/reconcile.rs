//! Import reconciliation.
//!
//! Bulk import introduces two failure modes single-record add never sees:
//! rows with no mobile number, and duplicates within the uploaded file
//! itself. Both are dropped and counted rather than failing the batch, so
//! one bad row never blocks the rest.

use std::collections::HashSet;

use crate::models::PatientRecord;

/// Outcome of reconciling a candidate batch against the existing collection.
#[derive(Debug, Default)]
pub struct ReconcileOutcome {
    /// Candidates that passed, in document order
    pub accepted: Vec<PatientRecord>,
    /// Rows dropped for an empty or duplicate mobile number
    pub rejected_count: usize,
}

impl ReconcileOutcome {
    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }
}

/// Counts reported back to the user after an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub accepted: usize,
    pub rejected: usize,
}

/// Merge imported candidates against the existing collection under the
/// mobile-number uniqueness invariant.
///
/// Single ordered pass: a candidate is rejected when its mobile number is
/// empty, already present in `existing`, or already accepted earlier in
/// this same batch.
pub fn reconcile(candidates: Vec<PatientRecord>, existing: &[PatientRecord]) -> ReconcileOutcome {
    let existing_mobiles: HashSet<&str> = existing
        .iter()
        .map(|record| record.mobile_number.as_str())
        .collect();

    let mut accepted_mobiles: HashSet<String> = HashSet::new();
    let mut outcome = ReconcileOutcome::default();

    for candidate in candidates {
        let mobile = candidate.mobile_number.as_str();
        if mobile.is_empty()
            || existing_mobiles.contains(mobile)
            || accepted_mobiles.contains(mobile)
        {
            outcome.rejected_count += 1;
            continue;
        }
        accepted_mobiles.insert(mobile.to_string());
        outcome.accepted.push(candidate);
    }

    outcome
}
