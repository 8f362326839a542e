//! Per-study-profile statistics.
//!
//! Universities are grouped by their main profile, students are joined to
//! universities through the university identifier, and each profile group is
//! reduced to a [`StatisticsEntry`](types::StatisticsEntry). The resulting
//! entries can be projected into a fixed five-column report table.

pub mod aggregate;
pub mod index;
pub mod projection;
pub mod types;
pub mod utility;

pub use aggregate::{aggregate, calculate_statistics};
pub use index::JoinIndex;
pub use projection::{Cell, ReportTable, project};
pub use types::StatisticsEntry;
