//! Reading student and university sheets from an XLSX workbook.
//!
//! Both sheets start with a header row, which is skipped. Columns are
//! positional:
//!
//! | Sheet        | 0             | 1         | 2          | 3                  | 4            |
//! |--------------|---------------|-----------|------------|--------------------|--------------|
//! | Students     | university id | full name | course no. | average exam score |              |
//! | Universities | id            | full name | short name | year of foundation | main profile |

use std::io::Cursor;

use anyhow::{Context, Result};
use calamine::{Data, Range, Reader, Xlsx};
use tracing::debug;

use crate::error::UnistatsError;
use crate::model::{Student, StudyProfile, University};

pub const DEFAULT_STUDENTS_SHEET: &str = "Students";
pub const DEFAULT_UNIVERSITIES_SHEET: &str = "Universities";

static EMPTY_CELL: Data = Data::Empty;

/// Names of the sheets holding each record kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetNames {
    pub students: String,
    pub universities: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            students: DEFAULT_STUDENTS_SHEET.to_string(),
            universities: DEFAULT_UNIVERSITIES_SHEET.to_string(),
        }
    }
}

pub fn read_students(bytes: &[u8], sheet: &str) -> Result<Vec<Student>> {
    let range = open_sheet(bytes, sheet)?;
    let mut students = Vec::new();

    for (row_number, row) in data_rows(&range) {
        let cells = RowCells { sheet, row_number, row };

        students.push(Student::new(
            cells.text(1),
            cells.text(0),
            cells.integer(2)?,
            cells.number(3)?,
        ));
    }

    debug!(sheet, count = students.len(), "Students read from workbook");
    Ok(students)
}

pub fn read_universities(bytes: &[u8], sheet: &str) -> Result<Vec<University>> {
    let range = open_sheet(bytes, sheet)?;
    let mut universities = Vec::new();

    for (row_number, row) in data_rows(&range) {
        let cells = RowCells { sheet, row_number, row };
        let main_profile = match cells.text(4) {
            Some(raw) => Some(
                raw.parse::<StudyProfile>()
                    .map_err(|e| cells.invalid(4, &e.to_string()))?,
            ),
            None => None,
        };

        universities.push(University::new(
            cells.text(0),
            cells.text(1),
            cells.text(2),
            cells.integer(3)?,
            main_profile,
        ));
    }

    debug!(sheet, count = universities.len(), "Universities read from workbook");
    Ok(universities)
}

fn open_sheet(bytes: &[u8], sheet: &str) -> Result<Range<Data>> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes.to_vec())).context("failed to open XLSX workbook")?;

    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(UnistatsError::MissingSheet(sheet.to_string()).into());
    }

    workbook
        .worksheet_range(sheet)
        .with_context(|| format!("failed to read sheet '{sheet}'"))
}

/// Rows after the header, paired with their 1-based spreadsheet row number.
/// Rows with no content at all are skipped.
fn data_rows(range: &Range<Data>) -> impl Iterator<Item = (usize, &[Data])> {
    let first_row = range.start().map_or(0, |(row, _)| row as usize);

    range
        .rows()
        .enumerate()
        .skip(1)
        .map(move |(idx, row)| (first_row + idx + 1, row))
        .filter(|(_, row)| row.iter().any(|cell| !matches!(cell, Data::Empty)))
}

struct RowCells<'a> {
    sheet: &'a str,
    row_number: usize,
    row: &'a [Data],
}

impl RowCells<'_> {
    fn cell(&self, column: usize) -> &Data {
        self.row.get(column).unwrap_or(&EMPTY_CELL)
    }

    /// Text value of a cell; blank cells are `None`, numbers are rendered.
    fn text(&self, column: usize) -> Option<String> {
        let text = match self.cell(column) {
            Data::Empty | Data::Error(_) => return None,
            Data::String(s) => s.trim().to_string(),
            Data::Float(f) if f.fract() == 0.0 => format!("{f:.0}"),
            other => other.to_string(),
        };
        (!text.is_empty()).then_some(text)
    }

    /// Numeric value of a cell; blank cells read as zero.
    fn number(&self, column: usize) -> Result<f64, UnistatsError> {
        match self.cell(column) {
            Data::Empty => Ok(0.0),
            Data::Float(f) => Ok(*f),
            Data::Int(i) => Ok(*i as f64),
            Data::String(s) if s.trim().is_empty() => Ok(0.0),
            Data::String(s) => s
                .trim()
                .parse()
                .map_err(|_| self.invalid(column, &format!("expected a number, found '{s}'"))),
            other => Err(self.invalid(column, &format!("expected a number, found '{other}'"))),
        }
    }

    /// Whole-number value of a cell that must fit `T`; blank cells read as zero.
    fn integer<T: TryFrom<i64>>(&self, column: usize) -> Result<T, UnistatsError> {
        let value = self.number(column)?;
        if value.fract() != 0.0 {
            return Err(self.invalid(column, &format!("expected a whole number, found {value}")));
        }
        // `as` saturates, so anything beyond i64 still fails the conversion below.
        T::try_from(value as i64)
            .map_err(|_| self.invalid(column, &format!("{value} is out of range for this column")))
    }

    fn invalid(&self, column: usize, reason: &str) -> UnistatsError {
        UnistatsError::InvalidCell {
            sheet: self.sheet.to_string(),
            row: self.row_number,
            column: column + 1,
            reason: reason.to_string(),
        }
    }
}
