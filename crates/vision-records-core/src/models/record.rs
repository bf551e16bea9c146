//! Patient record models.

use serde::{Deserialize, Serialize};

/// Refraction measurements for one eye.
///
/// All four values are free text; the clinic enters sign-prefixed decimals
/// like "-2.50" but nothing enforces a numeric format.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EyeMeasurement {
    /// Spherical power
    pub sphere: String,
    /// Cylindrical power
    pub cylinder: String,
    /// Cylinder axis in degrees
    pub axis: String,
    /// Additive power for near vision
    pub add: String,
}

impl EyeMeasurement {
    /// True when no value has been entered for this eye.
    pub fn is_empty(&self) -> bool {
        self.sphere.is_empty()
            && self.cylinder.is_empty()
            && self.axis.is_empty()
            && self.add.is_empty()
    }
}

/// A stored patient prescription record.
///
/// Serialized field names are camelCase because the persisted slot format
/// is shared with the consuming shell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    /// Unique record ID, minted at creation and never reassigned
    pub id: String,
    /// Examination date, ISO-8601 (`YYYY-MM-DD`)
    pub date: String,
    /// Patient name
    pub patient_name: String,
    /// Mobile number, the natural unique key across the collection
    pub mobile_number: String,
    /// Right eye refraction
    pub right_eye: EyeMeasurement,
    /// Left eye refraction
    pub left_eye: EyeMeasurement,
    /// Frame price, numeric-as-text
    pub frame_price: String,
    /// Glass price, numeric-as-text
    pub glass_price: String,
    /// Clinician remarks
    pub remarks: String,
    /// Prescription photo as a base64 data URL, if captured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prescription_image: Option<String>,
}

/// A record payload without an ID, as submitted by add/update forms.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordDraft {
    pub date: String,
    pub patient_name: String,
    pub mobile_number: String,
    pub right_eye: EyeMeasurement,
    pub left_eye: EyeMeasurement,
    pub frame_price: String,
    pub glass_price: String,
    pub remarks: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prescription_image: Option<String>,
}

impl PatientRecord {
    /// Create a record from a draft, minting a fresh ID.
    pub fn from_draft(draft: RecordDraft) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            date: draft.date,
            patient_name: draft.patient_name,
            mobile_number: draft.mobile_number,
            right_eye: draft.right_eye,
            left_eye: draft.left_eye,
            frame_price: draft.frame_price,
            glass_price: draft.glass_price,
            remarks: draft.remarks,
            prescription_image: draft.prescription_image,
        }
    }

    /// Rebuild this record from a draft, keeping its identity.
    pub fn apply_draft(&mut self, draft: RecordDraft) {
        let id = std::mem::take(&mut self.id);
        *self = Self::from_draft(draft);
        self.id = id;
    }

    /// True when a prescription photo is attached.
    pub fn has_prescription_image(&self) -> bool {
        self.prescription_image
            .as_deref()
            .is_some_and(|image| !image.is_empty())
    }

    /// Case-insensitive search predicate: substring of the patient name,
    /// or raw substring of the mobile number.
    pub fn matches(&self, lower_query: &str) -> bool {
        self.patient_name.to_lowercase().contains(lower_query)
            || self.mobile_number.contains(lower_query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, mobile: &str) -> RecordDraft {
        RecordDraft {
            date: "2024-03-15".into(),
            patient_name: name.into(),
            mobile_number: mobile.into(),
            remarks: "Annual checkup".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_draft_mints_id() {
        let record = PatientRecord::from_draft(draft("Asha", "9876543210"));
        assert_eq!(record.id.len(), 36); // UUID format
        assert_eq!(record.patient_name, "Asha");

        let other = PatientRecord::from_draft(draft("Asha", "9876543210"));
        assert_ne!(record.id, other.id);
    }

    #[test]
    fn test_apply_draft_preserves_id() {
        let mut record = PatientRecord::from_draft(draft("Asha", "9876543210"));
        let id = record.id.clone();

        record.apply_draft(draft("Asha Rao", "9876543210"));
        assert_eq!(record.id, id);
        assert_eq!(record.patient_name, "Asha Rao");
    }

    #[test]
    fn test_matches_is_case_insensitive_on_name() {
        let record = PatientRecord::from_draft(draft("John Smith", "9876543210"));
        assert!(record.matches("john"));
        assert!(record.matches("smith"));
        assert!(record.matches("876"));
        assert!(!record.matches("jane"));
    }

    #[test]
    fn test_serde_field_names_are_camel_case() {
        let record = PatientRecord::from_draft(draft("Asha", "9876543210"));
        let json = serde_json::to_string(&record).unwrap();

        assert!(json.contains("\"patientName\""));
        assert!(json.contains("\"mobileNumber\""));
        assert!(json.contains("\"rightEye\""));
        assert!(json.contains("\"framePrice\""));
        // Absent image is omitted entirely
        assert!(!json.contains("prescriptionImage"));
    }

    #[test]
    fn test_image_round_trips_when_present() {
        let mut record = PatientRecord::from_draft(draft("Asha", "9876543210"));
        record.prescription_image = Some("data:image/png;base64,AAAA".into());

        let json = serde_json::to_string(&record).unwrap();
        let back: PatientRecord = serde_json::from_str(&json).unwrap();
        assert!(back.has_prescription_image());
        assert_eq!(back, record);
    }

    #[test]
    fn test_eye_measurement_is_empty() {
        assert!(EyeMeasurement::default().is_empty());
        let eye = EyeMeasurement {
            sphere: "-2.50".into(),
            ..Default::default()
        };
        assert!(!eye.is_empty());
    }
}
