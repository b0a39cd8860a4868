//! The roster store.
//!
//! [`Roster`] owns every [`Student`] in display order and keeps an ID index
//! beside it for lookups. Operations keyed by ID return
//! [`RosterError`] for unknown students; nothing here panics on bad input.

use std::collections::{HashMap, HashSet};

use crate::error::RosterError;
use crate::model::{Score, Student, StudentId};
use crate::report::{AverageRow, BelowThreshold, StudentReport, StudentSummary, TopStudent};
use crate::statistics::{self, SummaryStatistics};

/// Ordered collection of student records keyed by unique ID.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    students: Vec<Student>,
    /// ID -> position in `students`. Rebuilt whenever positions shift.
    index: HashMap<StudentId, usize>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Students in current order.
    pub fn iter(&self) -> impl Iterator<Item = &Student> {
        self.students.iter()
    }

    pub fn ids(&self) -> Vec<StudentId> {
        self.students.iter().map(Student::id).collect()
    }

    pub fn contains(&self, id: StudentId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: StudentId) -> Option<&Student> {
        self.index.get(&id).map(|&pos| &self.students[pos])
    }

    /// Direct access for the decoder, which tracks its own current record.
    pub(crate) fn student_mut(&mut self, id: StudentId) -> Option<&mut Student> {
        let pos = *self.index.get(&id)?;
        self.students.get_mut(pos)
    }

    fn get_mut(&mut self, id: StudentId) -> Result<&mut Student, RosterError> {
        match self.index.get(&id) {
            Some(&pos) => Ok(&mut self.students[pos]),
            None => {
                tracing::warn!("student ID {id} not found");
                Err(RosterError::StudentNotFound(id))
            }
        }
    }

    fn reindex(&mut self) {
        self.index = self
            .students
            .iter()
            .enumerate()
            .map(|(pos, s)| (s.id(), pos))
            .collect();
    }

    // -----------------------------------------------------------------------
    // Records
    // -----------------------------------------------------------------------

    /// Append a new student. Rejected if the ID is already present.
    pub fn add_student(
        &mut self,
        id: StudentId,
        name: impl Into<String>,
    ) -> Result<&mut Student, RosterError> {
        if self.index.contains_key(&id) {
            tracing::warn!("student ID {id} already exists, not adding");
            return Err(RosterError::DuplicateId(id));
        }
        let pos = self.students.len();
        self.students.push(Student::new(id, name));
        self.index.insert(id, pos);
        Ok(&mut self.students[pos])
    }

    /// Remove a student together with all of their grades and attendance.
    pub fn remove_student(&mut self, id: StudentId) -> Result<Student, RosterError> {
        let Some(pos) = self.index.get(&id).copied() else {
            tracing::warn!("student ID {id} not found, nothing removed");
            return Err(RosterError::StudentNotFound(id));
        };
        let removed = self.students.remove(pos);
        self.reindex();
        tracing::debug!("removed student ID {id}");
        Ok(removed)
    }

    pub fn update_student_name(
        &mut self,
        id: StudentId,
        name: impl Into<String>,
    ) -> Result<(), RosterError> {
        self.get_mut(id)?.update_name(name);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Grades
    // -----------------------------------------------------------------------

    pub fn add_grade(
        &mut self,
        id: StudentId,
        subject: &str,
        score: Score,
    ) -> Result<(), RosterError> {
        self.get_mut(id)?.add_grade(subject, score);
        Ok(())
    }

    pub fn add_grades(
        &mut self,
        id: StudentId,
        subject: &str,
        scores: &[Score],
    ) -> Result<(), RosterError> {
        self.get_mut(id)?.add_grades(subject, scores);
        Ok(())
    }

    /// Replace the first occurrence of `old` in the subject's history.
    pub fn update_grade(
        &mut self,
        id: StudentId,
        subject: &str,
        old: Score,
        new: Score,
    ) -> Result<(), RosterError> {
        let student = self.get_mut(id)?;
        if !student.grades.contains_key(subject) {
            tracing::warn!("student ID {id} has no grades in {subject}");
            return Err(RosterError::SubjectNotFound {
                id,
                subject: subject.to_string(),
            });
        }
        if !student.update_grade(subject, old, new) {
            tracing::warn!("grade {old} not found in {subject} for student ID {id}");
            return Err(RosterError::GradeNotFound {
                id,
                subject: subject.to_string(),
                score: old,
            });
        }
        Ok(())
    }

    /// Remove every occurrence of `score`, returning how many were removed.
    pub fn delete_grade(
        &mut self,
        id: StudentId,
        subject: &str,
        score: Score,
    ) -> Result<usize, RosterError> {
        let student = self.get_mut(id)?;
        if !student.grades.contains_key(subject) {
            tracing::warn!("student ID {id} has no grades in {subject}");
            return Err(RosterError::SubjectNotFound {
                id,
                subject: subject.to_string(),
            });
        }
        match student.delete_grade(subject, score) {
            0 => {
                tracing::warn!("grade {score} not found in {subject} for student ID {id}");
                Err(RosterError::GradeNotFound {
                    id,
                    subject: subject.to_string(),
                    score,
                })
            }
            n => Ok(n),
        }
    }

    // -----------------------------------------------------------------------
    // Attendance
    // -----------------------------------------------------------------------

    pub fn mark_attendance(
        &mut self,
        id: StudentId,
        date: impl Into<String>,
    ) -> Result<(), RosterError> {
        self.get_mut(id)?.mark_attendance(date);
        Ok(())
    }

    /// Remove every occurrence of `date`, returning how many were removed.
    pub fn delete_attendance(&mut self, id: StudentId, date: &str) -> Result<usize, RosterError> {
        match self.get_mut(id)?.delete_attendance(date) {
            0 => {
                tracing::warn!("attendance on {date} not found for student ID {id}");
                Err(RosterError::AttendanceNotFound {
                    id,
                    date: date.to_string(),
                })
            }
            n => Ok(n),
        }
    }

    // -----------------------------------------------------------------------
    // Ordering
    // -----------------------------------------------------------------------

    /// Stable sort by name, lexicographic.
    pub fn sort_by_name(&mut self) {
        self.students.sort_by(|a, b| a.name.cmp(&b.name));
        self.reindex();
    }

    /// Stable sort by ID, ascending.
    pub fn sort_by_id(&mut self) {
        self.students.sort_by_key(Student::id);
        self.reindex();
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Every student, as ID and name, in current order.
    pub fn list(&self) -> Vec<StudentSummary> {
        self.students.iter().map(StudentSummary::from).collect()
    }

    /// All students whose name matches exactly (case-sensitive).
    pub fn search_by_name(&self, name: &str) -> Vec<&Student> {
        self.students.iter().filter(|s| s.name == name).collect()
    }

    /// Student with the strictly greatest average in `subject`.
    ///
    /// Ties go to the earlier student in roster order, and only a positive
    /// average can win.
    pub fn top_student_in_subject(&self, subject: &str) -> Option<TopStudent> {
        let mut best: Option<(&Student, f64)> = None;
        let mut highest = 0.0;
        for student in &self.students {
            if let Some(avg) = student.average_grade(subject) {
                if avg > highest {
                    highest = avg;
                    best = Some((student, avg));
                }
            }
        }
        best.map(|(s, average)| TopStudent {
            id: s.id(),
            name: s.name.clone(),
            average,
        })
    }

    /// One entry per (student, subject) with any score below `threshold`.
    pub fn below_threshold(&self, threshold: Score) -> Vec<BelowThreshold> {
        let mut hits = Vec::new();
        for student in &self.students {
            for (subject, scores) in &student.grades {
                if scores.iter().any(|s| *s < threshold) {
                    hits.push(BelowThreshold {
                        id: student.id(),
                        name: student.name.clone(),
                        subject: subject.clone(),
                    });
                }
            }
        }
        hits
    }

    /// Students whose subject map is empty.
    pub fn students_with_no_grades(&self) -> Vec<&Student> {
        self.students.iter().filter(|s| s.has_no_grades()).collect()
    }

    /// Distinct attendance dates across the roster, in first-seen order.
    pub fn observed_dates(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.students
            .iter()
            .flat_map(|s| s.attendance.iter())
            .map(String::as_str)
            .filter(|d| seen.insert(*d))
            .collect()
    }

    /// Students who attended every date any student attended.
    pub fn perfect_attendance_students(&self) -> Vec<&Student> {
        let all_dates = self.observed_dates();
        self.students
            .iter()
            .filter(|s| s.has_perfect_attendance(&all_dates))
            .collect()
    }

    /// Overall average of each student, in current order.
    pub fn overall_averages(&self) -> Vec<AverageRow> {
        self.students
            .iter()
            .map(|s| AverageRow {
                id: s.id(),
                name: s.name.clone(),
                overall_average: s.overall_average(),
            })
            .collect()
    }

    pub fn report(&self, id: StudentId) -> Result<StudentReport, RosterError> {
        self.get(id)
            .map(Student::report)
            .ok_or(RosterError::StudentNotFound(id))
    }

    pub fn reports(&self) -> Vec<StudentReport> {
        self.students.iter().map(Student::report).collect()
    }

    pub fn summary_statistics(&self) -> SummaryStatistics {
        statistics::summarize(&self.students)
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Student;
    type IntoIter = std::slice::Iter<'a, Student>;

    fn into_iter(self) -> Self::IntoIter {
        self.students.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_students() -> Roster {
        let mut roster = Roster::new();
        roster.add_student(1, "Ann").unwrap();
        roster.add_student(2, "Bo").unwrap();
        roster
    }

    #[test]
    fn duplicate_id_is_rejected_without_mutation() {
        let mut roster = two_students();
        roster.add_grade(1, "Math", 90).unwrap();
        let err = roster.add_student(1, "Impostor").unwrap_err();
        assert_eq!(err, RosterError::DuplicateId(1));
        assert_eq!(roster.len(), 2);
        let ann = roster.get(1).unwrap();
        assert_eq!(ann.name, "Ann");
        assert_eq!(ann.grades["Math"], vec![90]);
    }

    #[test]
    fn remove_unknown_leaves_roster_unchanged() {
        let mut roster = two_students();
        let before = roster.clone();
        let err = roster.remove_student(42).unwrap_err();
        assert_eq!(err, RosterError::StudentNotFound(42));
        assert!(err.is_not_found());
        assert_eq!(roster, before);
    }

    #[test]
    fn remove_discards_record_and_reindexes() {
        let mut roster = two_students();
        roster.add_student(3, "Cy").unwrap();
        roster.mark_attendance(1, "d1").unwrap();
        let removed = roster.remove_student(1).unwrap();
        assert_eq!(removed.attendance, vec!["d1"]);
        assert_eq!(roster.ids(), vec![2, 3]);
        assert_eq!(roster.get(3).unwrap().name, "Cy");
        assert!(!roster.contains(1));
    }

    #[test]
    fn mutations_on_unknown_student_report_not_found() {
        let mut roster = two_students();
        assert_eq!(
            roster.add_grade(9, "Math", 1),
            Err(RosterError::StudentNotFound(9))
        );
        assert_eq!(
            roster.update_student_name(9, "X"),
            Err(RosterError::StudentNotFound(9))
        );
        assert_eq!(
            roster.mark_attendance(9, "d1"),
            Err(RosterError::StudentNotFound(9))
        );
    }

    #[test]
    fn update_and_delete_report_missing_subject_or_grade() {
        let mut roster = two_students();
        roster.add_grades(1, "Math", &[80, 80]).unwrap();
        assert!(matches!(
            roster.update_grade(1, "Art", 1, 2),
            Err(RosterError::SubjectNotFound { .. })
        ));
        assert!(matches!(
            roster.update_grade(1, "Math", 1, 2),
            Err(RosterError::GradeNotFound { score: 1, .. })
        ));
        roster.update_grade(1, "Math", 80, 85).unwrap();
        assert_eq!(roster.get(1).unwrap().grades["Math"], vec![85, 80]);
        assert_eq!(roster.delete_grade(1, "Math", 80), Ok(1));
        assert!(matches!(
            roster.delete_grade(1, "Math", 80),
            Err(RosterError::GradeNotFound { .. })
        ));
        assert!(matches!(
            roster.delete_attendance(1, "d1"),
            Err(RosterError::AttendanceNotFound { .. })
        ));
    }

    #[test]
    fn top_student_picks_strictly_greatest() {
        let mut roster = two_students();
        roster.add_grades(1, "Math", &[90, 70]).unwrap();
        roster.add_grades(2, "Math", &[60]).unwrap();
        let top = roster.top_student_in_subject("Math").unwrap();
        assert_eq!(top.id, 1);
        assert_eq!(top.average, 80.0);
    }

    #[test]
    fn top_student_tie_keeps_first_inserted() {
        let mut roster = two_students();
        roster.add_grades(1, "Math", &[90, 70]).unwrap();
        roster.add_grades(2, "Math", &[80]).unwrap();
        assert_eq!(roster.top_student_in_subject("Math").unwrap().id, 1);
    }

    #[test]
    fn top_student_needs_positive_average() {
        let mut roster = two_students();
        roster.add_grade(1, "Math", 0).unwrap();
        roster.add_grade(2, "Math", -5).unwrap();
        assert_eq!(roster.top_student_in_subject("Math"), None);
        assert_eq!(roster.top_student_in_subject("Art"), None);
    }

    #[test]
    fn search_returns_every_exact_match() {
        let mut roster = two_students();
        roster.add_student(3, "Ann").unwrap();
        roster.add_student(4, "ann").unwrap();
        let ids: Vec<_> = roster.search_by_name("Ann").iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(roster.search_by_name("Zed").is_empty());
    }

    #[test]
    fn sorting_is_stable_and_idempotent() {
        let mut roster = Roster::new();
        roster.add_student(3, "Bo").unwrap();
        roster.add_student(1, "Ann").unwrap();
        roster.add_student(2, "Bo").unwrap();

        roster.sort_by_name();
        assert_eq!(roster.ids(), vec![1, 3, 2]);
        let once = roster.ids();
        roster.sort_by_name();
        assert_eq!(roster.ids(), once);

        roster.sort_by_id();
        assert_eq!(roster.ids(), vec![1, 2, 3]);
        roster.sort_by_id();
        assert_eq!(roster.ids(), vec![1, 2, 3]);
        assert_eq!(roster.get(2).unwrap().name, "Bo");
    }

    #[test]
    fn below_threshold_reports_once_per_subject() {
        let mut roster = two_students();
        roster.add_grades(1, "Math", &[50, 40, 95]).unwrap();
        roster.add_grades(1, "Science", &[65]).unwrap();
        roster.add_grades(1, "Art", &[99]).unwrap();
        roster.add_grades(2, "Math", &[70]).unwrap();

        let hits = roster.below_threshold(70);
        let pairs: Vec<_> = hits.iter().map(|h| (h.id, h.subject.as_str())).collect();
        assert_eq!(pairs, vec![(1, "Math"), (1, "Science")]);
    }

    #[test]
    fn no_grades_distinguishes_empty_map_from_empty_histories() {
        let mut roster = two_students();
        roster.add_grade(2, "Math", 50).unwrap();
        roster.delete_grade(2, "Math", 50).unwrap();
        let ids: Vec<_> = roster.students_with_no_grades().iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn perfect_attendance_is_relative_to_observed_dates() {
        let mut roster = two_students();
        roster.mark_attendance(1, "2024-01-01").unwrap();
        let ids: Vec<_> = roster
            .perfect_attendance_students()
            .iter()
            .map(|s| s.id())
            .collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn perfect_attendance_without_students() {
        assert!(Roster::new().perfect_attendance_students().is_empty());
    }

    #[test]
    fn perfect_attendance_without_any_dates_is_vacuous() {
        let roster = two_students();
        assert_eq!(roster.perfect_attendance_students().len(), 2);
    }

    #[test]
    fn observed_dates_are_deduplicated_in_first_seen_order() {
        let mut roster = two_students();
        roster.mark_attendance(2, "d2").unwrap();
        roster.mark_attendance(1, "d1").unwrap();
        roster.mark_attendance(1, "d2").unwrap();
        assert_eq!(roster.observed_dates(), vec!["d1", "d2"]);
    }

    #[test]
    fn reports_follow_roster_order() {
        let mut roster = two_students();
        roster.add_grade(2, "Math", 88).unwrap();
        let reports = roster.reports();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1].overall_average, Some(88.0));
        assert_eq!(roster.report(5), Err(RosterError::StudentNotFound(5)));
        let averages = roster.overall_averages();
        assert_eq!(averages[0].overall_average, None);
    }
}
