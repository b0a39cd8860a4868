//! Grade recording and grade queries.

use anyhow::Result;

use roster_core::codec::Field;
use roster_core::report::StudentSummary;
use roster_core::Score;

use super::apply;
use crate::session::Session;

pub fn add(session: &mut Session, id: i64, subject: &str, scores: &[Score]) -> Result<()> {
    let outcome = session
        .check(Field::Subject, subject)
        .and_then(|()| session.roster.add_grades(id, subject, scores));
    apply(session, outcome, |_| {
        let list: Vec<String> = scores.iter().map(|s| s.to_string()).collect();
        format!("Recorded {} for student {id} in {subject}", list.join(" "))
    })
}

pub fn update(
    session: &mut Session,
    id: i64,
    subject: &str,
    old: Score,
    new: Score,
) -> Result<()> {
    let outcome = session.roster.update_grade(id, subject, old, new);
    apply(session, outcome, |_| {
        format!("Updated {subject} grade {old} to {new} for student {id}")
    })
}

pub fn delete(session: &mut Session, id: i64, subject: &str, score: Score) -> Result<()> {
    let outcome = session.roster.delete_grade(id, subject, score);
    apply(session, outcome, |n| {
        format!("Deleted {n} {subject} grade(s) of {score} for student {id}")
    })
}

pub fn averages(session: &Session) -> Result<()> {
    let rows = session.roster.overall_averages();
    session.sink().averages(&rows)?;
    Ok(())
}

pub fn top(session: &Session, subject: &str) -> Result<()> {
    let top = session.roster.top_student_in_subject(subject);
    session.sink().top_student(subject, top.as_ref())?;
    Ok(())
}

pub fn below(session: &Session, threshold: Option<Score>) -> Result<()> {
    let threshold = threshold.unwrap_or(session.config.default_threshold);
    let hits = session.roster.below_threshold(threshold);
    session.sink().below_threshold(threshold, &hits)?;
    Ok(())
}

pub fn no_grades(session: &Session) -> Result<()> {
    let students: Vec<StudentSummary> = session
        .roster
        .students_with_no_grades()
        .into_iter()
        .map(StudentSummary::from)
        .collect();
    session
        .sink()
        .students("Students with no grades recorded", &students)?;
    Ok(())
}
