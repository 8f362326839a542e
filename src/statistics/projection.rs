//! Row-oriented view of the statistics, ready for a report writer.

use std::fmt;

use crate::statistics::types::StatisticsEntry;

pub const REPORT_HEADERS: [&str; 5] = [
    "Study Profile",
    "Average Exam Score",
    "Student Count",
    "University Count",
    "University Names",
];

/// A single report cell. Writers that understand numbers (XLSX) use the typed
/// variants; everything else goes through [`fmt::Display`].
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    /// Rendered with two decimals.
    Score(f64),
    Count(usize),
    Blank,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Score(v) => write!(f, "{v:.2}"),
            Cell::Count(n) => write!(f, "{n}"),
            Cell::Blank => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub headers: [&'static str; 5],
    pub rows: Vec<[Cell; 5]>,
}

impl ReportTable {
    pub fn to_string_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(Cell::to_string).collect())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Maps statistics entries to report rows, one row per entry in entry order.
pub fn project(entries: &[StatisticsEntry]) -> ReportTable {
    let rows = entries
        .iter()
        .map(|entry| {
            [
                Cell::Text(entry.study_profile.label().to_string()),
                entry.avg_exam_score.map_or(Cell::Blank, Cell::Score),
                Cell::Count(entry.student_count),
                Cell::Count(entry.university_count),
                Cell::Text(entry.university_names.join(", ")),
            ]
        })
        .collect();

    ReportTable {
        headers: REPORT_HEADERS,
        rows,
    }
}
