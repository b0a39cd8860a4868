//! roster-report — Report sinks for roster query results.
//!
//! [`TextSink`] renders human-readable tables, [`JsonSink`] writes one JSON
//! document per call for scripting.

pub mod json;
pub mod text;

pub use json::JsonSink;
pub use text::TextSink;

use roster_core::config::OutputFormat;
use roster_core::traits::ReportSink;

/// Build the sink for an output format, writing to `out`.
pub fn sink_for<'a, W: std::io::Write + 'a>(
    format: OutputFormat,
    out: W,
) -> Box<dyn ReportSink + 'a> {
    match format {
        OutputFormat::Text => Box::new(TextSink::new(out)),
        OutputFormat::Json => Box::new(JsonSink::new(out)),
    }
}
