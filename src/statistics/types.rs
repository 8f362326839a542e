//! Data types produced by the aggregation pipeline.

use serde::Serialize;

use crate::model::StudyProfile;

/// Statistics for one study profile.
///
/// An entry only exists for a profile with at least one university, so
/// `university_count` is never zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsEntry {
    pub study_profile: StudyProfile,
    /// Mean score of matched students, rounded half-up to two decimals.
    /// `None` when no student matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_exam_score: Option<f64>,
    pub student_count: usize,
    pub university_count: usize,
    /// Distinct university full names in first-seen order.
    pub university_names: Vec<String>,
}
