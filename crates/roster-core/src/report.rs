//! Report data views.
//!
//! These are the pre-computed values handed to a [`ReportSink`](crate::traits::ReportSink).
//! They carry no formatting decisions.

use serde::{Deserialize, Serialize};

use crate::model::{Score, Student, StudentId};

/// Identity of a student, as shown in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub id: StudentId,
    pub name: String,
}

impl From<&Student> for StudentSummary {
    fn from(s: &Student) -> Self {
        Self {
            id: s.id(),
            name: s.name.clone(),
        }
    }
}

/// Full report for one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentReport {
    pub id: StudentId,
    pub name: String,
    /// One entry per subject, in subject order.
    pub subjects: Vec<SubjectReport>,
    pub overall_average: Option<f64>,
    pub attendance: Vec<String>,
}

/// Grade history and average of one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectReport {
    pub subject: String,
    pub scores: Vec<Score>,
    pub average: Option<f64>,
}

/// A student's overall average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageRow {
    pub id: StudentId,
    pub name: String,
    pub overall_average: Option<f64>,
}

/// Winner of a top-student query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopStudent {
    pub id: StudentId,
    pub name: String,
    pub average: f64,
}

/// A subject in which a student has at least one score below the threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BelowThreshold {
    pub id: StudentId,
    pub name: String,
    pub subject: String,
}
