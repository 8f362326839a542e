//! Report and export writers.
//!
//! The statistics report (XLSX or CSV) is rendered from a
//! [`ReportTable`](crate::statistics::ReportTable). The JSON and XML exports
//! carry the full [`ExportDocument`]: input records, statistics and the
//! processing timestamp.

pub mod csv;
pub mod json;
pub mod xlsx;
pub mod xml;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::error::UnistatsError;
use crate::model::{Student, University};
use crate::statistics::{ReportTable, StatisticsEntry};

/// Base name of the statistics report files.
pub const REPORT_FILE_STEM: &str = "statistics-report";

/// Everything produced by one processing run, as exported to JSON and XML.
#[derive(Debug, Serialize)]
pub struct ExportDocument<'a> {
    #[serde(rename = "studentsInfo")]
    pub students: &'a [Student],
    #[serde(rename = "universitiesInfo")]
    pub universities: &'a [University],
    #[serde(rename = "statisticalInfo")]
    pub statistics: &'a [StatisticsEntry],
    #[serde(rename = "processedAt")]
    pub processed_at: DateTime<Utc>,
}

impl ExportDocument<'_> {
    /// `req_<yyyy-MM-dd_HH-mm-ss>.<extension>`, stamped with `processed_at`.
    pub fn file_name(&self, extension: &str) -> String {
        format!(
            "req_{}.{}",
            self.processed_at.format("%Y-%m-%d_%H-%M-%S"),
            extension
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Xlsx,
    Csv,
    Json,
    Xml,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Xlsx,
        OutputFormat::Csv,
        OutputFormat::Json,
        OutputFormat::Xml,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Xml => "xml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = UnistatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        OutputFormat::ALL
            .into_iter()
            .find(|f| f.extension() == wanted)
            .ok_or_else(|| UnistatsError::InvalidArgument(format!("unknown output format '{s}'")))
    }
}

/// Writes every requested output into `dir` and returns the written paths in
/// request order.
pub fn write_outputs(
    formats: &[OutputFormat],
    table: &ReportTable,
    document: &ExportDocument<'_>,
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(formats.len());

    for format in formats {
        let path = match format {
            OutputFormat::Xlsx => {
                let path = dir.join(format!("{REPORT_FILE_STEM}.xlsx"));
                xlsx::write_report(table, &path)?;
                path
            }
            OutputFormat::Csv => {
                let path = dir.join(format!("{REPORT_FILE_STEM}.csv"));
                csv::write_report(table, &path)?;
                path
            }
            OutputFormat::Json => json::write_export(document, dir)?,
            OutputFormat::Xml => xml::write_export(document, dir)?,
        };

        info!(format = %format, path = %path.display(), "Output written");
        written.push(path);
    }

    Ok(written)
}

/// Creates `dir` (and parents) if missing.
pub(crate) fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create directory '{}'", dir.display()))
}

/// Creates the parent directory of `path` if it has one.
pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::TimeZone;

    use super::*;
    use crate::model::StudyProfile;

    pub fn students() -> Vec<Student> {
        vec![
            Student::new(Some("Ann Lee".into()), Some("U1".into()), 2, 4.5),
            Student::new(Some("Bob & Co".into()), None, 1, 3.0),
        ]
    }

    pub fn universities() -> Vec<University> {
        vec![University::new(
            Some("U1".into()),
            Some("Alpha <University>".into()),
            Some("AU".into()),
            1755,
            Some(StudyProfile::Physics),
        )]
    }

    pub fn statistics() -> Vec<StatisticsEntry> {
        vec![
            StatisticsEntry {
                study_profile: StudyProfile::Physics,
                avg_exam_score: Some(4.5),
                student_count: 1,
                university_count: 1,
                university_names: vec!["Alpha <University>".into()],
            },
            StatisticsEntry {
                study_profile: StudyProfile::Medicine,
                avg_exam_score: None,
                student_count: 0,
                university_count: 1,
                university_names: vec![],
            },
        ]
    }

    pub fn processed_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    pub fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&dir); // clean up any prior run
        dir
    }
}
