use indexmap::IndexSet;
use tracing::{debug, instrument};

use crate::model::{Student, StudyProfile, University};
use crate::statistics::index::JoinIndex;
use crate::statistics::types::StatisticsEntry;
use crate::statistics::utility::{mean, round_half_up};

/// Decimal places kept for the average exam score.
const SCORE_SCALE: u32 = 2;

/// Reduces a [`JoinIndex`] into one [`StatisticsEntry`] per study profile.
///
/// Entries follow the order in which each profile first appears in the
/// university list. Profiles without universities never produce an entry, and
/// students whose university identifier matches no university are ignored.
#[instrument(skip_all)]
pub fn aggregate(index: &JoinIndex<'_>) -> Vec<StatisticsEntry> {
    let entries: Vec<StatisticsEntry> = index
        .profiles()
        .map(|profile| build_entry(profile, index))
        .collect();

    debug!(entries = entries.len(), "Statistics aggregated");
    entries
}

/// Builds the join index over `universities` and `students` and aggregates it.
pub fn calculate_statistics(students: &[Student], universities: &[University]) -> Vec<StatisticsEntry> {
    let index = JoinIndex::build(universities, students);
    aggregate(&index)
}

fn build_entry(profile: StudyProfile, index: &JoinIndex<'_>) -> StatisticsEntry {
    let universities = index.universities_of(profile);

    // Distinct by name value; two universities sharing a name still count twice
    // in `university_count`.
    let university_names: IndexSet<&str> = universities
        .iter()
        .filter_map(|u| u.full_name.as_deref())
        .collect();

    let scores: Vec<f64> = universities
        .iter()
        .filter_map(|u| u.id.as_deref())
        .flat_map(|id| index.students_of(id))
        .map(|s| s.avg_exam_score)
        .collect();

    let avg_exam_score = mean(&scores).map(|avg| round_half_up(avg, SCORE_SCALE));

    debug!(
        profile = profile.tag(),
        students = scores.len(),
        universities = universities.len(),
        avg_exam_score,
        "Profile aggregated"
    );

    StatisticsEntry {
        study_profile: profile,
        avg_exam_score,
        student_count: scores.len(),
        university_count: universities.len(),
        university_names: university_names.into_iter().map(String::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn university(id: &str, name: Option<&str>, profile: StudyProfile) -> University {
        University::new(
            Some(id.to_string()),
            name.map(String::from),
            None,
            1900,
            Some(profile),
        )
    }

    fn student(uni: Option<&str>, score: f64) -> Student {
        Student::new(Some("Student".into()), uni.map(String::from), 1, score)
    }

    #[test]
    fn test_same_name_universities_count_twice_but_list_once() {
        let universities = vec![
            university("U1", Some("Alpha"), StudyProfile::Physics),
            university("U2", Some("Alpha"), StudyProfile::Physics),
        ];
        let students = vec![student(Some("U1"), 80.0), student(Some("U2"), 90.0)];

        let entries = calculate_statistics(&students, &universities);

        assert_eq!(
            entries,
            vec![StatisticsEntry {
                study_profile: StudyProfile::Physics,
                avg_exam_score: Some(85.0),
                student_count: 2,
                university_count: 2,
                university_names: vec!["Alpha".to_string()],
            }]
        );
    }

    #[test]
    fn test_no_universities_gives_no_entries() {
        let students = vec![student(Some("U1"), 80.0)];
        assert!(calculate_statistics(&students, &[]).is_empty());
    }

    #[test]
    fn test_profile_without_students_has_no_average() {
        let universities = vec![university("M1", Some("Math U"), StudyProfile::Mathematics)];
        let entries = calculate_statistics(&[], &universities);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].student_count, 0);
        assert_eq!(entries[0].university_count, 1);
        assert_eq!(entries[0].avg_exam_score, None);
    }

    #[test]
    fn test_unmatched_students_are_excluded() {
        let universities = vec![university("U1", Some("Alpha"), StudyProfile::Medicine)];
        let students = vec![
            student(Some("U1"), 70.0),
            student(Some("NOPE"), 10.0),
            student(None, 10.0),
        ];

        let entries = calculate_statistics(&students, &universities);

        assert_eq!(entries[0].student_count, 1);
        assert_eq!(entries[0].avg_exam_score, Some(70.0));
    }

    #[test]
    fn test_entries_follow_first_seen_profile_order() {
        let universities = vec![
            university("L1", Some("Lang"), StudyProfile::Linguistics),
            university("P1", Some("Phys"), StudyProfile::Physics),
            university("L2", Some("Lang 2"), StudyProfile::Linguistics),
            university("C1", Some("Comp"), StudyProfile::ComputerScience),
        ];

        let entries = calculate_statistics(&[], &universities);
        let profiles: Vec<_> = entries.iter().map(|e| e.study_profile).collect();

        assert_eq!(
            profiles,
            vec![
                StudyProfile::Linguistics,
                StudyProfile::Physics,
                StudyProfile::ComputerScience
            ]
        );
        assert_eq!(entries[0].university_names, vec!["Lang", "Lang 2"]);
    }

    #[test]
    fn test_missing_names_are_skipped_but_counted() {
        let universities = vec![
            university("U1", None, StudyProfile::Jurisprudence),
            university("U2", Some("Law School"), StudyProfile::Jurisprudence),
        ];

        let entries = calculate_statistics(&[], &universities);

        assert_eq!(entries[0].university_count, 2);
        assert_eq!(entries[0].university_names, vec!["Law School"]);
    }

    #[test]
    fn test_average_is_rounded_half_up() {
        let universities = vec![university("U1", Some("Alpha"), StudyProfile::Physics)];
        let students = vec![
            student(Some("U1"), 4.0),
            student(Some("U1"), 4.0),
            student(Some("U1"), 5.0),
        ];

        let entries = calculate_statistics(&students, &universities);

        assert_eq!(entries[0].avg_exam_score, Some(4.33));
    }

    #[test]
    fn test_students_concatenate_in_university_order() {
        let universities = vec![
            university("U2", Some("Beta"), StudyProfile::Physics),
            university("U1", Some("Alpha"), StudyProfile::Physics),
        ];
        let students = vec![
            student(Some("U1"), 1.0),
            student(Some("U2"), 2.0),
            student(Some("U1"), 3.0),
        ];
        let index = JoinIndex::build(&universities, &students);

        let matched: Vec<f64> = index
            .universities_of(StudyProfile::Physics)
            .iter()
            .filter_map(|u| u.id.as_deref())
            .flat_map(|id| index.students_of(id))
            .map(|s| s.avg_exam_score)
            .collect();

        assert_eq!(matched, vec![2.0, 1.0, 3.0]);
        assert_eq!(aggregate(&index)[0].avg_exam_score, Some(2.0));
    }

    #[test]
    fn test_rerun_is_identical() {
        let universities = vec![
            university("U1", Some("Alpha"), StudyProfile::Medicine),
            university("U2", Some("Beta"), StudyProfile::Physics),
            university("U3", Some("Gamma"), StudyProfile::Mathematics),
        ];
        let students = vec![student(Some("U3"), 3.0), student(Some("U1"), 4.0)];

        let first = calculate_statistics(&students, &universities);
        let second = calculate_statistics(&students, &universities);

        assert_eq!(first, second);
    }

    #[test]
    fn test_aggregate_index_built_from_nullable_slots() {
        let universities = vec![
            None,
            Some(university("U1", Some("Alpha"), StudyProfile::Linguistics)),
            None,
        ];
        let students = vec![Some(student(Some("U1"), 4.5)), None, Some(student(None, 2.0))];
        let index = JoinIndex::build(
            universities.iter().map(Option::as_ref),
            students.iter().map(Option::as_ref),
        );

        let entries = aggregate(&index);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].study_profile, StudyProfile::Linguistics);
        assert_eq!(entries[0].student_count, 1);
        assert_eq!(entries[0].avg_exam_score, Some(4.5));
        assert_eq!(entries[0].university_names, vec!["Alpha".to_string()]);
    }
}
