//! Collaborator traits.
//!
//! The core never formats dates or output itself. A [`DateSource`] supplies
//! opaque date strings and a [`ReportSink`] receives pre-computed values for
//! display. Implementations live in `clock` and in the `roster-report` crate.

use std::io;

use crate::report::{AverageRow, BelowThreshold, StudentReport, StudentSummary, TopStudent};
use crate::statistics::SummaryStatistics;

// ---------------------------------------------------------------------------
// Date source
// ---------------------------------------------------------------------------

/// Supplies the date string used when attendance is marked for "today".
///
/// The core only compares dates for equality, so the format is up to the
/// implementation.
pub trait DateSource {
    fn today(&self) -> String;
}

// ---------------------------------------------------------------------------
// Report sink
// ---------------------------------------------------------------------------

/// Receives query results for display.
pub trait ReportSink {
    /// A one-line status message, e.g. the outcome of a mutation.
    fn notice(&mut self, message: &str) -> io::Result<()>;

    /// A list of students under a heading.
    fn students(&mut self, title: &str, students: &[StudentSummary]) -> io::Result<()>;

    /// Full reports for one or more students.
    fn reports(&mut self, reports: &[StudentReport]) -> io::Result<()>;

    /// Overall average per student.
    fn averages(&mut self, rows: &[AverageRow]) -> io::Result<()>;

    /// Result of a top-student query.
    fn top_student(&mut self, subject: &str, top: Option<&TopStudent>) -> io::Result<()>;

    /// Subjects with a score below `threshold`.
    fn below_threshold(&mut self, threshold: i32, hits: &[BelowThreshold]) -> io::Result<()>;

    /// Roster-wide summary.
    fn summary(&mut self, stats: &SummaryStatistics) -> io::Result<()>;
}

/// Sink that discards everything.
pub struct NoopSink;

impl ReportSink for NoopSink {
    fn notice(&mut self, _: &str) -> io::Result<()> {
        Ok(())
    }
    fn students(&mut self, _: &str, _: &[StudentSummary]) -> io::Result<()> {
        Ok(())
    }
    fn reports(&mut self, _: &[StudentReport]) -> io::Result<()> {
        Ok(())
    }
    fn averages(&mut self, _: &[AverageRow]) -> io::Result<()> {
        Ok(())
    }
    fn top_student(&mut self, _: &str, _: Option<&TopStudent>) -> io::Result<()> {
        Ok(())
    }
    fn below_threshold(&mut self, _: i32, _: &[BelowThreshold]) -> io::Result<()> {
        Ok(())
    }
    fn summary(&mut self, _: &SummaryStatistics) -> io::Result<()> {
        Ok(())
    }
}
