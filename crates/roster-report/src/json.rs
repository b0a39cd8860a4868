//! JSON report sink.
//!
//! Every call writes one compact JSON document followed by a newline, with a
//! `kind` field naming the result.

use std::io::{self, Write};

use serde_json::{json, Value};

use roster_core::report::{AverageRow, BelowThreshold, StudentReport, StudentSummary, TopStudent};
use roster_core::statistics::SummaryStatistics;
use roster_core::traits::ReportSink;

/// Writes results as JSON lines.
pub struct JsonSink<W: Write> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, value: Value) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, &value)?;
        writeln!(self.out)
    }
}

impl<W: Write> ReportSink for JsonSink<W> {
    fn notice(&mut self, message: &str) -> io::Result<()> {
        self.emit(json!({ "kind": "notice", "message": message }))
    }

    fn students(&mut self, title: &str, students: &[StudentSummary]) -> io::Result<()> {
        self.emit(json!({ "kind": "students", "title": title, "students": students }))
    }

    fn reports(&mut self, reports: &[StudentReport]) -> io::Result<()> {
        self.emit(json!({ "kind": "reports", "reports": reports }))
    }

    fn averages(&mut self, rows: &[AverageRow]) -> io::Result<()> {
        self.emit(json!({ "kind": "averages", "averages": rows }))
    }

    fn top_student(&mut self, subject: &str, top: Option<&TopStudent>) -> io::Result<()> {
        self.emit(json!({ "kind": "top_student", "subject": subject, "top": top }))
    }

    fn below_threshold(&mut self, threshold: i32, hits: &[BelowThreshold]) -> io::Result<()> {
        self.emit(json!({ "kind": "below_threshold", "threshold": threshold, "hits": hits }))
    }

    fn summary(&mut self, stats: &SummaryStatistics) -> io::Result<()> {
        self.emit(json!({ "kind": "summary", "summary": stats }))
    }
}
