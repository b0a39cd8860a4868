//! Student management: add, remove, rename, list, search, sort.

use anyhow::Result;

use roster_core::codec::Field;
use roster_core::report::StudentSummary;

use super::apply;
use crate::session::Session;
use crate::SortKey;

pub fn add(session: &mut Session, id: i64, name: String) -> Result<()> {
    let outcome = session
        .check(Field::Name, &name)
        .and_then(|()| session.roster.add_student(id, name))
        .map(|s| s.name.clone());
    apply(session, outcome, |name| format!("Added student {id}: {name}"))
}

pub fn remove(session: &mut Session, id: i64) -> Result<()> {
    let outcome = session.roster.remove_student(id);
    apply(session, outcome, |s| {
        format!("Removed student {id}: {}", s.name)
    })
}

pub fn rename(session: &mut Session, id: i64, name: String) -> Result<()> {
    let outcome = session
        .check(Field::Name, &name)
        .and_then(|()| session.roster.update_student_name(id, name.clone()));
    apply(session, outcome, |_| format!("Student {id} renamed to {name}"))
}

pub fn list(session: &Session) -> Result<()> {
    let students = session.roster.list();
    session.sink().students("All students", &students)?;
    Ok(())
}

pub fn search(session: &Session, name: &str) -> Result<()> {
    let found: Vec<StudentSummary> = session
        .roster
        .search_by_name(name)
        .into_iter()
        .map(StudentSummary::from)
        .collect();
    session
        .sink()
        .students(&format!("Students named {name}"), &found)?;
    Ok(())
}

pub fn sort(session: &mut Session, by: SortKey) -> Result<()> {
    match by {
        SortKey::Name => session.roster.sort_by_name(),
        SortKey::Id => session.roster.sort_by_id(),
    }
    session.save()?;
    let key = match by {
        SortKey::Name => "name",
        SortKey::Id => "ID",
    };
    session
        .sink()
        .notice(&format!("Sorted {} students by {key}", session.roster.len()))?;
    Ok(())
}
