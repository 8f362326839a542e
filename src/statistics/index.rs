//! Join indices over the raw record lists.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::debug;

use crate::model::{Student, StudyProfile, University};

/// Lookups built once per aggregation run.
///
/// `universities_by_profile` keeps profiles in the order they were first seen
/// in the university list; that order becomes the order of the statistics
/// entries. Both maps borrow the input records.
#[derive(Debug, Default)]
pub struct JoinIndex<'a> {
    universities_by_profile: IndexMap<StudyProfile, Vec<&'a University>>,
    students_by_university_id: HashMap<&'a str, Vec<&'a Student>>,
}

impl<'a> JoinIndex<'a> {
    /// Builds both indices.
    ///
    /// Accepts plain records (`&[University]`) or nullable slots
    /// (`&[Option<University>]`). Missing records, universities without a main
    /// profile and students without a university identifier are skipped.
    pub fn build<U, S>(universities: U, students: S) -> Self
    where
        U: IntoIterator,
        U::Item: Into<Option<&'a University>>,
        S: IntoIterator,
        S::Item: Into<Option<&'a Student>>,
    {
        let mut universities_by_profile: IndexMap<StudyProfile, Vec<&'a University>> =
            IndexMap::new();
        let mut skipped_universities = 0usize;

        for university in universities
            .into_iter()
            .filter_map(Into::<Option<&'a University>>::into)
        {
            match university.main_profile {
                Some(profile) => universities_by_profile
                    .entry(profile)
                    .or_default()
                    .push(university),
                None => skipped_universities += 1,
            }
        }

        let mut students_by_university_id: HashMap<&'a str, Vec<&'a Student>> = HashMap::new();
        let mut skipped_students = 0usize;

        for student in students
            .into_iter()
            .filter_map(Into::<Option<&'a Student>>::into)
        {
            match student.university_id.as_deref() {
                Some(id) => students_by_university_id.entry(id).or_default().push(student),
                None => skipped_students += 1,
            }
        }

        debug!(
            profiles = universities_by_profile.len(),
            university_ids = students_by_university_id.len(),
            skipped_universities,
            skipped_students,
            "Join index built"
        );

        Self {
            universities_by_profile,
            students_by_university_id,
        }
    }

    /// Universities of `profile`, in input order.
    pub fn universities_of(&self, profile: StudyProfile) -> &[&'a University] {
        self.universities_by_profile
            .get(&profile)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Students enrolled at the university identified by `university_id`, in input order.
    pub fn students_of(&self, university_id: &str) -> &[&'a Student] {
        self.students_by_university_id
            .get(university_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Profiles in first-seen order.
    pub fn profiles(&self) -> impl Iterator<Item = StudyProfile> + '_ {
        self.universities_by_profile.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.universities_by_profile.is_empty()
    }
}
