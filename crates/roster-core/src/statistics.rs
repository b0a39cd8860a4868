//! Roster-wide summary statistics.

use serde::{Deserialize, Serialize};

use crate::model::Student;

/// Aggregate figures across the whole roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Number of students on the roster.
    pub total_students: usize,
    /// Mean of every score of every subject of every student.
    pub average_grade: Option<f64>,
    /// Mean number of attendance entries per student (not distinct days).
    pub average_attendance: Option<f64>,
}

impl SummaryStatistics {
    /// Legacy rendering where "nothing to average" is 0.0.
    pub fn average_grade_or_zero(&self) -> f64 {
        self.average_grade.unwrap_or(0.0)
    }

    pub fn average_attendance_or_zero(&self) -> f64 {
        self.average_attendance.unwrap_or(0.0)
    }
}

/// Compute summary statistics over a sequence of students.
pub fn summarize<'a>(students: impl IntoIterator<Item = &'a Student>) -> SummaryStatistics {
    let mut total_students = 0usize;
    let mut grade_sum = 0i64;
    let mut grade_count = 0usize;
    let mut attendance_sum = 0usize;

    for student in students {
        total_students += 1;
        for score in student.grades.values().flatten() {
            grade_sum += *score as i64;
            grade_count += 1;
        }
        attendance_sum += student.attendance.len();
    }

    SummaryStatistics {
        total_students,
        average_grade: (grade_count > 0).then(|| grade_sum as f64 / grade_count as f64),
        average_attendance: (total_students > 0)
            .then(|| attendance_sum as f64 / total_students as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_roster() {
        let stats = summarize(std::iter::empty());
        assert_eq!(stats.total_students, 0);
        assert_eq!(stats.average_grade, None);
        assert_eq!(stats.average_attendance, None);
        assert_eq!(stats.average_grade_or_zero(), 0.0);
    }

    #[test]
    fn averages_pool_all_scores() {
        let mut a = Student::new(1, "Ann");
        a.add_grades("Math", &[90, 70]);
        a.add_grade("Science", 80);
        a.mark_attendance("d1");
        a.mark_attendance("d1");
        let mut b = Student::new(2, "Bo");
        b.add_grade("Math", 60);

        let stats = summarize([&a, &b]);
        assert_eq!(stats.total_students, 2);
        assert_eq!(stats.average_grade, Some(75.0));
        // Duplicate dates count as separate entries.
        assert_eq!(stats.average_attendance, Some(1.0));
    }

    #[test]
    fn students_without_grades_still_count_for_attendance() {
        let a = Student::new(1, "Ann");
        let stats = summarize([&a]);
        assert_eq!(stats.total_students, 1);
        assert_eq!(stats.average_grade, None);
        assert_eq!(stats.average_attendance, Some(0.0));
    }
}
