//! Typed errors surfaced by the library.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnistatsError {
    /// An ordering criterion tag that is unknown, or not defined for the
    /// requested record kind.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unsupported record format for '{0}'")]
    UnsupportedFormat(String),

    #[error("sheet '{0}' not found in workbook")]
    MissingSheet(String),

    #[error("sheet '{sheet}', row {row}, column {column}: {reason}")]
    InvalidCell {
        sheet: String,
        row: usize,
        column: usize,
        reason: String,
    },
}
