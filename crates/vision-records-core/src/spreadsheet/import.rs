//! Spreadsheet import.
//!
//! Parses a tabular document into candidate records. Every field defaults
//! to the empty string when its column is missing or the cell is blank;
//! validation beyond that is the reconciler's job. A structurally unreadable
//! document fails the whole import.

use std::collections::HashMap;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use thiserror::Error;

use super::schema::IMAGE_PAYLOAD_HEADER;
use crate::models::{EyeMeasurement, PatientRecord, RecordDraft};

/// Import errors. Any of these aborts the import with no records added.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("The workbook contains no sheets")]
    NoSheet,

    #[error("The document has no header row")]
    MissingHeader,
}

/// Read a tabular document into candidate records, minting a fresh ID per
/// row. CSV files are parsed directly; anything else is opened as an Excel
/// workbook and the first sheet is taken.
pub fn read_candidates(path: &Path) -> Result<Vec<PatientRecord>, ImportError> {
    let extension = path.extension().and_then(|ext| ext.to_str());
    let rows = match extension {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => {
            parse_csv(&std::fs::read_to_string(path)?)
        }
        _ => read_workbook_rows(path)?,
    };
    rows_to_candidates(rows)
}

/// Read the first sheet of an Excel workbook as string cells.
fn read_workbook_rows(path: &Path) -> Result<Vec<Vec<String>>, ImportError> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ImportError::NoSheet)?;
    let range = workbook.worksheet_range(&sheet_name)?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect())
}

/// Map header-indexed rows onto candidate records.
///
/// The first row is the header; columns are matched by exact name, so column
/// order in the document does not matter. Fully empty rows are skipped.
pub fn rows_to_candidates(rows: Vec<Vec<String>>) -> Result<Vec<PatientRecord>, ImportError> {
    let mut rows = rows.into_iter();
    let header = rows.next().ok_or(ImportError::MissingHeader)?;
    if header.iter().all(|cell| cell.trim().is_empty()) {
        return Err(ImportError::MissingHeader);
    }

    let columns: HashMap<String, usize> = header
        .iter()
        .enumerate()
        .map(|(index, name)| (name.trim().to_string(), index))
        .collect();

    let mut candidates = Vec::new();
    for row in rows {
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        let cell = |name: &str| -> String {
            columns
                .get(name)
                .and_then(|&index| row.get(index))
                .cloned()
                .unwrap_or_default()
        };

        let image = cell(IMAGE_PAYLOAD_HEADER);
        candidates.push(PatientRecord::from_draft(RecordDraft {
            date: cell("Date"),
            patient_name: cell("Patient Name"),
            mobile_number: cell("Mobile Number"),
            right_eye: EyeMeasurement {
                sphere: cell("Right Eye Sphere"),
                cylinder: cell("Right Eye Cylinder"),
                axis: cell("Right Eye Axis"),
                add: cell("Right Eye Add"),
            },
            left_eye: EyeMeasurement {
                sphere: cell("Left Eye Sphere"),
                cylinder: cell("Left Eye Cylinder"),
                axis: cell("Left Eye Axis"),
                add: cell("Left Eye Add"),
            },
            frame_price: cell("Frame Price"),
            glass_price: cell("Glass Price"),
            remarks: cell("Remarks"),
            prescription_image: if image.is_empty() { None } else { Some(image) },
        }));
    }

    Ok(candidates)
}

/// Parse CSV text into rows of string cells. Handles quoted fields, doubled
/// quotes, and CRLF line endings.
pub fn parse_csv(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ',' => row.push(std::mem::take(&mut field)),
                '\r' => {}
                '\n' => {
                    row.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut row));
                }
                _ => field.push(c),
            }
        }
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            // Mobile numbers and prices come back as floats; drop the ".0"
            if f.fract() == 0.0 {
                format!("{:.0}", f)
            } else {
                format!("{}", f)
            }
        }
        Data::Int(i) => format!("{}", i),
        Data::Bool(b) => {
            if *b {
                "Yes".to_string()
            } else {
                "No".to_string()
            }
        }
        Data::Error(_) => String::new(),
        Data::DateTime(dt) => format!("{}", dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::schema::HEADERS;

    fn header_row() -> Vec<String> {
        HEADERS.iter().map(|h| h.to_string()).collect()
    }

    fn blank_row() -> Vec<String> {
        vec![String::new(); HEADERS.len()]
    }

    #[test]
    fn test_parse_csv_plain() {
        let rows = parse_csv("a,b,c\nd,e,f\n");
        assert_eq!(rows, vec![vec!["a", "b", "c"], vec!["d", "e", "f"]]);
    }

    #[test]
    fn test_parse_csv_quoted_fields() {
        let rows = parse_csv("\"with,comma\",\"with\"\"quote\",\"two\nlines\"\n");
        assert_eq!(rows, vec![vec!["with,comma", "with\"quote", "two\nlines"]]);
    }

    #[test]
    fn test_parse_csv_crlf_and_missing_final_newline() {
        let rows = parse_csv("a,b\r\nc,d");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn test_rows_to_candidates_maps_schema() {
        let mut row = blank_row();
        row[0] = "2024-03-15".into();
        row[1] = "Asha".into();
        row[2] = "9876543210".into();
        row[3] = "-2.50".into();
        row[13] = "Myopia".into();

        let candidates = rows_to_candidates(vec![header_row(), row]).unwrap();
        assert_eq!(candidates.len(), 1);

        let candidate = &candidates[0];
        assert_eq!(candidate.date, "2024-03-15");
        assert_eq!(candidate.patient_name, "Asha");
        assert_eq!(candidate.mobile_number, "9876543210");
        assert_eq!(candidate.right_eye.sphere, "-2.50");
        assert_eq!(candidate.remarks, "Myopia");
        assert_eq!(candidate.id.len(), 36); // fresh UUID per row
        assert!(candidate.prescription_image.is_none());
    }

    #[test]
    fn test_columns_matched_by_name_not_position() {
        let header = vec!["Mobile Number".to_string(), "Patient Name".to_string()];
        let row = vec!["9876543210".to_string(), "Asha".to_string()];

        let candidates = rows_to_candidates(vec![header, row]).unwrap();
        assert_eq!(candidates[0].patient_name, "Asha");
        assert_eq!(candidates[0].mobile_number, "9876543210");
        // Absent columns default to empty
        assert_eq!(candidates[0].date, "");
    }

    #[test]
    fn test_image_payload_column_round_trips() {
        let header = vec![
            "Mobile Number".to_string(),
            IMAGE_PAYLOAD_HEADER.to_string(),
        ];
        let with = vec!["111".to_string(), "data:image/png;base64,AAAA".to_string()];
        let without = vec!["222".to_string(), String::new()];

        let candidates = rows_to_candidates(vec![header, with, without]).unwrap();
        assert_eq!(
            candidates[0].prescription_image.as_deref(),
            Some("data:image/png;base64,AAAA")
        );
        assert!(candidates[1].prescription_image.is_none());
    }

    #[test]
    fn test_empty_rows_skipped() {
        let mut row = blank_row();
        row[2] = "9876543210".into();

        let candidates =
            rows_to_candidates(vec![header_row(), blank_row(), row, blank_row()]).unwrap();
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn test_missing_header_rejected() {
        assert!(matches!(
            rows_to_candidates(Vec::new()),
            Err(ImportError::MissingHeader)
        ));
        assert!(matches!(
            rows_to_candidates(vec![blank_row()]),
            Err(ImportError::MissingHeader)
        ));
    }

    #[test]
    fn test_unreadable_workbook_fails() {
        let result = read_candidates(Path::new("/nonexistent/records.xlsx"));
        assert!(result.is_err());
    }
}
