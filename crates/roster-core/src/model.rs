//! Core data model types for roster.
//!
//! A [`Student`] owns one student's identity, their per-subject grade
//! histories and the dates they attended. The mutators here are silent: they
//! report what they changed through their return values and leave it to the
//! roster store to turn "nothing matched" into a reported condition.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::report::{StudentReport, SubjectReport};

/// Caller-assigned student identifier, unique within a roster.
pub type StudentId = i64;

/// A single grade. No range is enforced.
pub type Score = i32;

/// One student's record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Identifier, immutable after creation.
    id: StudentId,
    /// Display name. May be empty.
    pub name: String,
    /// Grade history per subject, in order of entry. Duplicates are allowed.
    #[serde(default)]
    pub grades: BTreeMap<String, Vec<Score>>,
    /// Attendance dates in order of entry. Duplicates are allowed.
    #[serde(default)]
    pub attendance: Vec<String>,
}

impl Student {
    pub fn new(id: StudentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            grades: BTreeMap::new(),
            attendance: Vec::new(),
        }
    }

    pub fn id(&self) -> StudentId {
        self.id
    }

    pub fn update_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Append one score to a subject's history.
    pub fn add_grade(&mut self, subject: &str, score: Score) {
        self.grades.entry(subject.to_string()).or_default().push(score);
    }

    /// Append several scores to a subject's history.
    ///
    /// The subject entry is created even when `scores` is empty.
    pub fn add_grades(&mut self, subject: &str, scores: &[Score]) {
        self.grades
            .entry(subject.to_string())
            .or_default()
            .extend_from_slice(scores);
    }

    /// Replace the first occurrence of `old` with `new`.
    ///
    /// Returns `false` when the subject is unknown or `old` is absent.
    pub fn update_grade(&mut self, subject: &str, old: Score, new: Score) -> bool {
        let Some(history) = self.grades.get_mut(subject) else {
            return false;
        };
        match history.iter_mut().find(|s| **s == old) {
            Some(slot) => {
                *slot = new;
                true
            }
            None => false,
        }
    }

    /// Remove every occurrence of `score`, returning how many were removed.
    ///
    /// The subject entry stays, even when its history becomes empty.
    pub fn delete_grade(&mut self, subject: &str, score: Score) -> usize {
        let Some(history) = self.grades.get_mut(subject) else {
            return 0;
        };
        let before = history.len();
        history.retain(|s| *s != score);
        before - history.len()
    }

    /// Mean of one subject's history, or `None` if there is nothing to average.
    pub fn average_grade(&self, subject: &str) -> Option<f64> {
        self.grades.get(subject).and_then(|h| mean(h))
    }

    /// Legacy form of [`average_grade`](Self::average_grade): 0.0 means "no data".
    pub fn average_grade_or_zero(&self, subject: &str) -> f64 {
        self.average_grade(subject).unwrap_or(0.0)
    }

    /// Mean across every score of every subject.
    pub fn overall_average(&self) -> Option<f64> {
        let (sum, count) = self
            .grades
            .values()
            .flatten()
            .fold((0i64, 0usize), |(sum, count), s| (sum + *s as i64, count + 1));
        (count > 0).then(|| sum as f64 / count as f64)
    }

    /// Legacy form of [`overall_average`](Self::overall_average).
    pub fn overall_average_or_zero(&self) -> f64 {
        self.overall_average().unwrap_or(0.0)
    }

    /// `true` when the subject map itself is empty.
    ///
    /// A subject whose history was emptied still counts as having grades.
    pub fn has_no_grades(&self) -> bool {
        self.grades.is_empty()
    }

    pub fn mark_attendance(&mut self, date: impl Into<String>) {
        self.attendance.push(date.into());
    }

    /// Remove every occurrence of `date`, returning how many were removed.
    pub fn delete_attendance(&mut self, date: &str) -> usize {
        let before = self.attendance.len();
        self.attendance.retain(|d| d != date);
        before - self.attendance.len()
    }

    /// `true` iff every date in `all_dates` was attended at least once.
    pub fn has_perfect_attendance<S: AsRef<str>>(&self, all_dates: &[S]) -> bool {
        let attended: HashSet<&str> = self.attendance.iter().map(String::as_str).collect();
        all_dates.iter().all(|d| attended.contains(d.as_ref()))
    }

    /// Build the per-student report view.
    pub fn report(&self) -> StudentReport {
        StudentReport {
            id: self.id,
            name: self.name.clone(),
            subjects: self
                .grades
                .iter()
                .map(|(subject, scores)| SubjectReport {
                    subject: subject.clone(),
                    scores: scores.clone(),
                    average: mean(scores),
                })
                .collect(),
            overall_average: self.overall_average(),
            attendance: self.attendance.clone(),
        }
    }
}

/// Arithmetic mean of a score list.
pub(crate) fn mean(scores: &[Score]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let sum: i64 = scores.iter().map(|s| *s as i64).sum();
    Some(sum as f64 / scores.len() as f64)
}
