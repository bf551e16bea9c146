//! Spreadsheet export.

use chrono::NaiveDate;

use super::schema::HEADERS;
use crate::models::PatientRecord;

/// Render the collection as CSV, one row per record in store order.
///
/// The prescription image is reduced to a Yes/No presence marker; embedding
/// base64 payloads would bloat the document far past what spreadsheet tools
/// handle comfortably.
pub fn to_csv(records: &[PatientRecord]) -> String {
    let mut csv = String::new();

    csv.push_str(&HEADERS.join(","));
    csv.push('\n');

    for record in records {
        let fields = [
            record.date.as_str(),
            record.patient_name.as_str(),
            record.mobile_number.as_str(),
            record.right_eye.sphere.as_str(),
            record.right_eye.cylinder.as_str(),
            record.right_eye.axis.as_str(),
            record.right_eye.add.as_str(),
            record.left_eye.sphere.as_str(),
            record.left_eye.cylinder.as_str(),
            record.left_eye.axis.as_str(),
            record.left_eye.add.as_str(),
            record.frame_price.as_str(),
            record.glass_price.as_str(),
            record.remarks.as_str(),
            if record.has_prescription_image() {
                "Yes"
            } else {
                "No"
            },
        ];
        let row: Vec<String> = fields.iter().map(|field| escape_csv(field)).collect();
        csv.push_str(&row.join(","));
        csv.push('\n');
    }

    csv
}

/// File name for an export taken on the given date.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("PatientRecords_{}.csv", date.format("%Y-%m-%d"))
}

/// File name for an export taken today.
pub fn export_file_name_today() -> String {
    export_file_name(chrono::Utc::now().date_naive())
}

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
