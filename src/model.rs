//! Record types read from a record source: students, universities and the
//! study profiles universities are grouped by.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::UnistatsError;

/// Academic domain a university is primarily associated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudyProfile {
    Physics,
    ComputerScience,
    Mathematics,
    Jurisprudence,
    Medicine,
    Linguistics,
}

impl StudyProfile {
    pub const ALL: [StudyProfile; 6] = [
        StudyProfile::Physics,
        StudyProfile::ComputerScience,
        StudyProfile::Mathematics,
        StudyProfile::Jurisprudence,
        StudyProfile::Medicine,
        StudyProfile::Linguistics,
    ];

    /// Human-readable label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            StudyProfile::Physics => "Physics",
            StudyProfile::ComputerScience => "Computer Science",
            StudyProfile::Mathematics => "Mathematics",
            StudyProfile::Jurisprudence => "Jurisprudence",
            StudyProfile::Medicine => "Medicine",
            StudyProfile::Linguistics => "Linguistics",
        }
    }

    /// Upper-snake tag used in source data, e.g. `COMPUTER_SCIENCE`.
    pub fn tag(&self) -> &'static str {
        match self {
            StudyProfile::Physics => "PHYSICS",
            StudyProfile::ComputerScience => "COMPUTER_SCIENCE",
            StudyProfile::Mathematics => "MATHEMATICS",
            StudyProfile::Jurisprudence => "JURISPRUDENCE",
            StudyProfile::Medicine => "MEDICINE",
            StudyProfile::Linguistics => "LINGUISTICS",
        }
    }
}

impl fmt::Display for StudyProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StudyProfile {
    type Err = UnistatsError;

    /// Accepts the tag (`PHYSICS`) or, ignoring case, the label (`physics`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        StudyProfile::ALL
            .into_iter()
            .find(|p| p.tag() == s || p.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnistatsError::InvalidArgument(format!("unknown study profile '{s}'")))
    }
}

impl<'de> Deserialize<'de> for StudyProfile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A student row. Field names on the wire follow the JSON export format; the
/// aliases are the CSV column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(
        rename = "student_name",
        alias = "full_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub full_name: Option<String>,

    #[serde(
        rename = "universityId",
        alias = "university_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub university_id: Option<String>,

    #[serde(rename = "course_year", alias = "current_course_number")]
    pub current_course_number: u32,

    #[serde(rename = "average_score", alias = "avg_exam_score")]
    pub avg_exam_score: f64,
}

impl Student {
    pub fn new(
        full_name: Option<String>,
        university_id: Option<String>,
        current_course_number: u32,
        avg_exam_score: f64,
    ) -> Self {
        Self {
            full_name,
            university_id,
            current_course_number,
            avg_exam_score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct University {
    #[serde(
        rename = "university_id",
        alias = "id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,

    #[serde(
        rename = "full_university_name",
        alias = "full_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub full_name: Option<String>,

    #[serde(
        rename = "abbreviated_name",
        alias = "short_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub short_name: Option<String>,

    #[serde(rename = "establishment_year", alias = "year_of_foundation")]
    pub year_of_foundation: i32,

    #[serde(
        rename = "primary_study_profile",
        alias = "main_profile",
        skip_serializing_if = "Option::is_none"
    )]
    pub main_profile: Option<StudyProfile>,
}

impl University {
    pub fn new(
        id: Option<String>,
        full_name: Option<String>,
        short_name: Option<String>,
        year_of_foundation: i32,
        main_profile: Option<StudyProfile>,
    ) -> Self {
        Self {
            id,
            full_name,
            short_name,
            year_of_foundation,
            main_profile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_parses_tag_and_label() {
        assert_eq!("PHYSICS".parse::<StudyProfile>(), Ok(StudyProfile::Physics));
        assert_eq!(
            "computer science".parse::<StudyProfile>(),
            Ok(StudyProfile::ComputerScience)
        );
        assert!("ASTROLOGY".parse::<StudyProfile>().is_err());
    }

    #[test]
    fn test_student_reads_json_field_names() {
        let json = r#"{"student_name":"Ann","universityId":"U1","course_year":3,"average_score":4.5}"#;
        let student: Student = serde_json::from_str(json).unwrap();

        assert_eq!(student.full_name.as_deref(), Some("Ann"));
        assert_eq!(student.university_id.as_deref(), Some("U1"));
        assert_eq!(student.current_course_number, 3);
        assert_eq!(student.avg_exam_score, 4.5);
    }

    #[test]
    fn test_university_missing_profile_is_none() {
        let json = r#"{"university_id":"U1","full_university_name":"Alpha","establishment_year":1900}"#;
        let university: University = serde_json::from_str(json).unwrap();

        assert_eq!(university.main_profile, None);
        assert_eq!(university.short_name, None);
    }

    #[test]
    fn test_university_serializes_profile_tag() {
        let university = University::new(
            Some("U1".into()),
            None,
            None,
            1755,
            Some(StudyProfile::Mathematics),
        );
        let json = serde_json::to_string(&university).unwrap();

        assert!(json.contains(r#""primary_study_profile":"MATHEMATICS""#));
        assert!(!json.contains("full_university_name"));
    }
}
