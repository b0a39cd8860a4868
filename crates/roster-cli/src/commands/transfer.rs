//! Import and export of whole rosters.

use std::path::Path;

use anyhow::{Context, Result};

use roster_core::codec::{self, Dialect};

use crate::session::Session;

/// Replace the roster with `file` and save it to the data file.
///
/// A file that cannot be opened or decoded, or that holds values the data
/// file's dialect cannot store, leaves the data file untouched.
pub fn import(session: &mut Session, file: &Path, dialect: Option<Dialect>) -> Result<()> {
    let dialect = dialect.unwrap_or(session.dialect);
    let imported = codec::load(file, dialect)
        .with_context(|| format!("import of {} failed", file.display()))?;
    codec::check_roster(&imported, session.dialect).with_context(|| {
        format!(
            "import of {} failed: use --dialect tagged to keep its contents",
            file.display()
        )
    })?;
    session.roster = imported;
    session.save()?;
    session.sink().notice(&format!(
        "Imported {} students from {}",
        session.roster.len(),
        file.display()
    ))?;
    Ok(())
}

pub fn export(session: &Session, file: &Path, dialect: Option<Dialect>) -> Result<()> {
    let dialect = dialect.unwrap_or(session.dialect);
    session
        .roster
        .export_file(file, dialect)
        .with_context(|| format!("export to {} failed", file.display()))?;
    session.sink().notice(&format!(
        "Exported {} students to {} ({dialect})",
        session.roster.len(),
        file.display()
    ))?;
    Ok(())
}
