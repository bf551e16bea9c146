//! Spreadsheet column schema.
//!
//! Header strings are part of the external interface: exported documents
//! carry them, and imports resolve columns by these exact names. The image
//! column records presence only; payloads never travel in the spreadsheet.

/// Export/import column headers, in emitted order.
pub const HEADERS: [&str; 15] = [
    "Date",
    "Patient Name",
    "Mobile Number",
    "Right Eye Sphere",
    "Right Eye Cylinder",
    "Right Eye Axis",
    "Right Eye Add",
    "Left Eye Sphere",
    "Left Eye Cylinder",
    "Left Eye Axis",
    "Left Eye Add",
    "Frame Price",
    "Glass Price",
    "Remarks",
    "Has Prescription Image",
];

/// Optional import-only column carrying a raw image payload, honored for
/// round-tripping documents produced elsewhere.
pub const IMAGE_PAYLOAD_HEADER: &str = "Prescription Image";
