//! [`DateSource`] implementations.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{Local, NaiveDate};

use crate::traits::DateSource;

/// Default `strftime` pattern for attendance dates.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// `true` if `format` is a `strftime` pattern that can render a date.
///
/// Patterns that parse but need a time or an offset (`%H:%M`, `%z`) fail
/// when applied to a bare date, so they are rejected too.
pub fn is_valid_format(format: &str) -> bool {
    StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
        && NaiveDate::from_ymd_opt(2000, 1, 31)
            .is_some_and(|sample| format_date(sample, format).is_some())
}

/// Render `date` with `format`, or `None` if the pattern cannot render it.
fn format_date(date: NaiveDate, format: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(format)).ok()?;
    Some(out)
}

/// Today's local date, formatted with a `strftime` pattern.
#[derive(Debug, Clone)]
pub struct SystemClock {
    format: String,
}

impl SystemClock {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMAT)
    }
}

impl DateSource for SystemClock {
    /// Falls back to [`DEFAULT_DATE_FORMAT`] when the pattern cannot render
    /// a date.
    fn today(&self) -> String {
        let today = Local::now().date_naive();
        format_date(today, &self.format).unwrap_or_else(|| {
            tracing::warn!(
                "date format '{}' cannot render a date, using {DEFAULT_DATE_FORMAT}",
                self.format
            );
            today.format(DEFAULT_DATE_FORMAT).to_string()
        })
    }
}

/// Always returns the same date. Useful in tests and for back-filling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedDate(pub String);

impl DateSource for FixedDate {
    fn today(&self) -> String {
        self.0.clone()
    }
}
