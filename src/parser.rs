//! Decoding of student and university records from raw source bytes.

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::UnistatsError;
use crate::model::{Student, University};
use crate::workbook::{self, SheetNames};

/// Encoding of a record source, derived from its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Csv,
    Json,
    Xlsx,
}

impl RecordFormat {
    /// Detects the format from a path or URL.
    ///
    /// # Errors
    ///
    /// Returns [`UnistatsError::UnsupportedFormat`] for unknown extensions.
    pub fn from_source(source: &str) -> Result<Self, UnistatsError> {
        // Ignore any query string on URLs.
        let path = source.split(['?', '#']).next().unwrap_or(source);
        let extension = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("csv") => Ok(RecordFormat::Csv),
            Some("json") => Ok(RecordFormat::Json),
            Some("xlsx") | Some("xlsm") => Ok(RecordFormat::Xlsx),
            _ => Err(UnistatsError::UnsupportedFormat(source.to_string())),
        }
    }
}

/// Decodes students from `bytes`.
///
/// # Errors
///
/// Returns an error if the bytes are not valid for `format`, or if a required
/// column holds a value of the wrong type.
pub fn parse_students(bytes: &[u8], format: RecordFormat, sheets: &SheetNames) -> Result<Vec<Student>> {
    match format {
        RecordFormat::Csv => parse_csv(bytes),
        RecordFormat::Json => parse_json(bytes),
        RecordFormat::Xlsx => workbook::read_students(bytes, &sheets.students),
    }
}

/// Decodes universities from `bytes`. See [`parse_students`].
pub fn parse_universities(
    bytes: &[u8],
    format: RecordFormat,
    sheets: &SheetNames,
) -> Result<Vec<University>> {
    match format {
        RecordFormat::Csv => parse_csv(bytes),
        RecordFormat::Json => parse_json(bytes),
        RecordFormat::Xlsx => workbook::read_universities(bytes, &sheets.universities),
    }
}

fn parse_csv<T: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(bytes);
    let mut records = Vec::new();

    for (line, result) in rdr.deserialize().enumerate() {
        // +2: one for the header row, one for 1-based numbering.
        let record: T = result.with_context(|| format!("invalid CSV record on line {}", line + 2))?;
        records.push(record);
    }

    Ok(records)
}

/// JSON sources are arrays; `null` items are dropped here.
fn parse_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>> {
    let items: Vec<Option<T>> = serde_json::from_slice(bytes).context("invalid JSON record array")?;
    let total = items.len();
    let records: Vec<T> = items.into_iter().flatten().collect();

    if records.len() < total {
        debug!(skipped = total - records.len(), "Null JSON records skipped");
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StudyProfile;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(RecordFormat::from_source("data/students.csv"), Ok(RecordFormat::Csv));
        assert_eq!(RecordFormat::from_source("Info.XLSX"), Ok(RecordFormat::Xlsx));
        assert_eq!(
            RecordFormat::from_source("https://example.org/u.json?token=1"),
            Ok(RecordFormat::Json)
        );
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        assert!(matches!(
            RecordFormat::from_source("students.txt"),
            Err(UnistatsError::UnsupportedFormat(_))
        ));
        assert!(RecordFormat::from_source("students").is_err());
    }

    #[test]
    fn test_parse_csv_students_with_empty_cells() {
        let csv = "university_id,full_name,current_course_number,avg_exam_score\n\
                   U1,Ann Lee,2,4.5\n\
                   ,Bob Ray,3,3.9\n";
        let students = parse_students(csv.as_bytes(), RecordFormat::Csv, &SheetNames::default()).unwrap();

        assert_eq!(students.len(), 2);
        assert_eq!(students[0].university_id.as_deref(), Some("U1"));
        assert_eq!(students[1].university_id, None);
        assert_eq!(students[1].avg_exam_score, 3.9);
    }

    #[test]
    fn test_parse_csv_universities() {
        let csv = "id,full_name,short_name,year_of_foundation,main_profile\n\
                   U1,Alpha University,AU,1755,PHYSICS\n\
                   U2,Beta Institute,BI,1930,\n";
        let universities =
            parse_universities(csv.as_bytes(), RecordFormat::Csv, &SheetNames::default()).unwrap();

        assert_eq!(universities[0].main_profile, Some(StudyProfile::Physics));
        assert_eq!(universities[1].main_profile, None);
    }

    #[test]
    fn test_parse_csv_bad_number_fails() {
        let csv = "university_id,full_name,current_course_number,avg_exam_score\n\
                   U1,Ann Lee,second,4.5\n";
        let result = parse_students(csv.as_bytes(), RecordFormat::Csv, &SheetNames::default());

        assert!(result.is_err());
    }

    #[test]
    fn test_parse_json_skips_nulls() {
        let json = r#"[
            {"student_name": "Ann", "universityId": "U1", "course_year": 1, "average_score": 4.0},
            null
        ]"#;
        let students = parse_students(json.as_bytes(), RecordFormat::Json, &SheetNames::default()).unwrap();

        assert_eq!(students.len(), 1);
    }

    #[test]
    fn test_parse_json_unknown_profile_fails() {
        let json = r#"[{"university_id": "U1", "establishment_year": 1900, "primary_study_profile": "ALCHEMY"}]"#;
        let result = parse_universities(json.as_bytes(), RecordFormat::Json, &SheetNames::default());

        assert!(result.is_err());
    }
}
