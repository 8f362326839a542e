//! Sort criteria and the comparators they select.
//!
//! The criterion set is closed, so each lookup is a single `match` that hands
//! back a plain function pointer. Nothing here holds state; comparators can be
//! looked up and used from any thread.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::UnistatsError;
use crate::model::{Student, University};

pub type StudentComparator = fn(&Student, &Student) -> Ordering;
pub type UniversityComparator = fn(&University, &University) -> Ordering;

/// Field (and direction) to order a record collection by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortCriterion {
    FullName,
    UniversityId,
    CurrentCourseNumber,
    AvgExamScore,
    Id,
    ShortName,
    YearOfFoundation,
    MainProfile,
}

impl SortCriterion {
    pub const ALL: [SortCriterion; 8] = [
        SortCriterion::FullName,
        SortCriterion::UniversityId,
        SortCriterion::CurrentCourseNumber,
        SortCriterion::AvgExamScore,
        SortCriterion::Id,
        SortCriterion::ShortName,
        SortCriterion::YearOfFoundation,
        SortCriterion::MainProfile,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            SortCriterion::FullName => "FULL_NAME",
            SortCriterion::UniversityId => "UNIVERSITY_ID",
            SortCriterion::CurrentCourseNumber => "CURRENT_COURSE_NUMBER",
            SortCriterion::AvgExamScore => "AVG_EXAM_SCORE",
            SortCriterion::Id => "ID",
            SortCriterion::ShortName => "SHORT_NAME",
            SortCriterion::YearOfFoundation => "YEAR_OF_FOUNDATION",
            SortCriterion::MainProfile => "MAIN_PROFILE",
        }
    }
}

impl fmt::Display for SortCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for SortCriterion {
    type Err = UnistatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase().replace('-', "_");
        SortCriterion::ALL
            .into_iter()
            .find(|c| c.tag() == wanted)
            .ok_or_else(|| UnistatsError::InvalidArgument(format!("unknown sort criterion '{s}'")))
    }
}

/// Returns the student comparator for `criterion`.
///
/// # Errors
///
/// [`UnistatsError::InvalidArgument`] if the criterion does not apply to
/// students (e.g. `SHORT_NAME`).
pub fn student_comparator(criterion: SortCriterion) -> Result<StudentComparator, UnistatsError> {
    let cmp: StudentComparator = match criterion {
        SortCriterion::FullName => |a, b| a.full_name.cmp(&b.full_name),
        SortCriterion::UniversityId => |a, b| a.university_id.cmp(&b.university_id),
        SortCriterion::CurrentCourseNumber => {
            |a, b| a.current_course_number.cmp(&b.current_course_number)
        }
        // Highest score first.
        SortCriterion::AvgExamScore => |a, b| b.avg_exam_score.total_cmp(&a.avg_exam_score),
        other => {
            return Err(UnistatsError::InvalidArgument(format!(
                "sort criterion {other} does not apply to students"
            )));
        }
    };
    Ok(cmp)
}

/// Returns the university comparator for `criterion`.
///
/// # Errors
///
/// [`UnistatsError::InvalidArgument`] if the criterion does not apply to
/// universities (e.g. `AVG_EXAM_SCORE`).
pub fn university_comparator(
    criterion: SortCriterion,
) -> Result<UniversityComparator, UnistatsError> {
    let cmp: UniversityComparator = match criterion {
        SortCriterion::Id => |a, b| a.id.cmp(&b.id),
        SortCriterion::FullName => |a, b| a.full_name.cmp(&b.full_name),
        SortCriterion::ShortName => |a, b| a.short_name.cmp(&b.short_name),
        SortCriterion::YearOfFoundation => |a, b| a.year_of_foundation.cmp(&b.year_of_foundation),
        SortCriterion::MainProfile => |a, b| {
            let a = a.main_profile.map(|p| p.label());
            let b = b.main_profile.map(|p| p.label());
            a.cmp(&b)
        },
        other => {
            return Err(UnistatsError::InvalidArgument(format!(
                "sort criterion {other} does not apply to universities"
            )));
        }
    };
    Ok(cmp)
}

/// Stable sort of `students` by `criterion`.
pub fn sort_students(students: &mut [Student], criterion: SortCriterion) -> Result<(), UnistatsError> {
    let cmp = student_comparator(criterion)?;
    students.sort_by(cmp);
    Ok(())
}

/// Stable sort of `universities` by `criterion`.
pub fn sort_universities(
    universities: &mut [University],
    criterion: SortCriterion,
) -> Result<(), UnistatsError> {
    let cmp = university_comparator(criterion)?;
    universities.sort_by(cmp);
    Ok(())
}
