//! Error types for roster operations and persistence.
//!
//! Roster errors are reported conditions: the caller prints them and carries
//! on. Codec and persistence errors abort the import or export that raised
//! them and leave the in-memory roster untouched.

use std::path::PathBuf;

use thiserror::Error;

use crate::codec::{Dialect, Field};
use crate::model::{Score, StudentId};

/// Errors raised by roster store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// A student with this ID is already on the roster.
    #[error("student ID {0} already exists")]
    DuplicateId(StudentId),

    /// No student with this ID is on the roster.
    #[error("student ID {0} not found")]
    StudentNotFound(StudentId),

    /// The student has no grade history for the subject.
    #[error("student ID {id} has no grades in {subject}")]
    SubjectNotFound { id: StudentId, subject: String },

    /// The score does not occur in the subject's grade history.
    #[error("grade {score} not found in {subject} for student ID {id}")]
    GradeNotFound {
        id: StudentId,
        subject: String,
        score: Score,
    },

    /// The date does not occur in the student's attendance.
    #[error("attendance on {date} not found for student ID {id}")]
    AttendanceNotFound { id: StudentId, date: String },

    /// The value would not read back from a data file of this dialect.
    #[error("{field} '{value}' cannot be stored in a {dialect} data file")]
    NotStorable {
        field: Field,
        value: String,
        dialect: Dialect,
    },
}

impl RosterError {
    /// Returns `true` for the lookup failures.
    pub fn is_not_found(&self) -> bool {
        !matches!(
            self,
            RosterError::DuplicateId(_) | RosterError::NotStorable { .. }
        )
    }
}

/// Errors raised while decoding the flat-text format.
///
/// Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum CodecError {
    /// An identity line whose ID is not an integer.
    #[error("line {line}: invalid student ID '{value}'")]
    InvalidId { line: usize, value: String },

    /// A grade line containing a score that is not an integer.
    #[error("line {line}: invalid score '{value}'")]
    InvalidScore { line: usize, value: String },

    /// A line the tagged dialect cannot interpret.
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    /// A second `student` line for an ID (tagged dialect).
    #[error("line {line}: duplicate student ID {id}")]
    DuplicateId { line: usize, id: StudentId },

    /// Reading or writing the underlying stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the file-level save/load helpers.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The file could not be opened for reading.
    #[error("failed to open {} for import: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file could not be created for writing.
    #[error("failed to open {} for export: {source}", path.display())]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file opened but its contents could not be decoded.
    #[error("failed to import {}: {source}", path.display())]
    Decode { path: PathBuf, source: CodecError },

    /// Writing the encoded roster failed part way.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
