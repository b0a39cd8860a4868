//! Student reports and roster-wide summary.

use anyhow::Result;

use crate::session::Session;

/// Report one student, or every student when no ID is given.
pub fn report(session: &Session, id: Option<i64>) -> Result<()> {
    let mut sink = session.sink();
    match id {
        Some(id) => match session.roster.report(id) {
            Ok(report) => sink.reports(&[report])?,
            Err(e) => sink.notice(&format!("No report: {e}"))?,
        },
        None => sink.reports(&session.roster.reports())?,
    }
    Ok(())
}

pub fn summary(session: &Session) -> Result<()> {
    let stats = session.roster.summary_statistics();
    session.sink().summary(&stats)?;
    Ok(())
}
