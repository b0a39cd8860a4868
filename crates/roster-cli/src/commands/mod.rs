pub mod attendance;
pub mod grades;
pub mod reports;
pub mod students;
pub mod transfer;

use anyhow::Result;
use roster_core::RosterError;

use crate::session::Session;

/// Report the outcome of a roster mutation and save on success.
///
/// Lookup failures are reported to the user and are not errors of the
/// command itself.
pub(crate) fn apply<T>(
    session: &mut Session,
    outcome: Result<T, RosterError>,
    done: impl FnOnce(T) -> String,
) -> Result<()> {
    match outcome {
        Ok(value) => {
            let message = done(value);
            session.save()?;
            session.sink().notice(&message)?;
        }
        Err(e) => session.sink().notice(&capitalize(&e.to_string()))?,
    }
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
