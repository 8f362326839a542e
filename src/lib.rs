pub mod error;
pub mod fetch;
pub mod model;
pub mod ordering;
pub mod output;
pub mod parser;
pub mod publish;
pub mod statistics;
pub mod workbook;

pub use error::UnistatsError;
pub use model::{Student, StudyProfile, University};
pub use ordering::SortCriterion;
pub use statistics::{StatisticsEntry, calculate_statistics};
