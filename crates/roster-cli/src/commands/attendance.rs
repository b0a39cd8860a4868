//! Attendance marking and the perfect-attendance query.

use anyhow::Result;

use roster_core::clock::SystemClock;
use roster_core::codec::Field;
use roster_core::report::StudentSummary;
use roster_core::traits::DateSource;

use super::apply;
use crate::session::Session;

/// Mark a student present on `date`, or today in the configured format.
pub fn mark(session: &mut Session, id: i64, date: Option<String>) -> Result<()> {
    let date = date.unwrap_or_else(|| {
        SystemClock::new(session.config.date_format.as_str()).today()
    });
    let outcome = session
        .check(Field::Date, &date)
        .and_then(|()| session.roster.mark_attendance(id, date.clone()));
    apply(session, outcome, |_| {
        format!("Marked student {id} present on {date}")
    })
}

pub fn delete(session: &mut Session, id: i64, date: &str) -> Result<()> {
    let outcome = session.roster.delete_attendance(id, date);
    apply(session, outcome, |n| {
        format!("Deleted {n} attendance entry(ies) on {date} for student {id}")
    })
}

pub fn perfect(session: &Session) -> Result<()> {
    let students: Vec<StudentSummary> = session
        .roster
        .perfect_attendance_students()
        .into_iter()
        .map(StudentSummary::from)
        .collect();
    session
        .sink()
        .students("Students with perfect attendance", &students)?;
    Ok(())
}
