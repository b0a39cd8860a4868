//! Plain-text report sink.

use std::io::{self, Write};

use comfy_table::Table;

use roster_core::report::{AverageRow, BelowThreshold, StudentReport, StudentSummary, TopStudent};
use roster_core::statistics::SummaryStatistics;
use roster_core::traits::ReportSink;

/// Format an average with two decimals, or `n/a` when there is no data.
pub fn format_average(avg: Option<f64>) -> String {
    match avg {
        Some(v) => format!("{v:.2}"),
        None => "n/a".to_string(),
    }
}

/// Renders results as text tables.
pub struct TextSink<W: Write> {
    out: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for TextSink<W> {
    fn notice(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{message}")
    }

    fn students(&mut self, title: &str, students: &[StudentSummary]) -> io::Result<()> {
        writeln!(self.out, "{title}:")?;
        if students.is_empty() {
            return writeln!(self.out, "  (none)");
        }
        let mut table = Table::new();
        table.set_header(vec!["ID", "Name"]);
        for s in students {
            table.add_row(vec![s.id.to_string(), s.name.clone()]);
        }
        writeln!(self.out, "{table}")
    }

    fn reports(&mut self, reports: &[StudentReport]) -> io::Result<()> {
        if reports.is_empty() {
            return writeln!(self.out, "No students available.");
        }
        for (i, r) in reports.iter().enumerate() {
            if i > 0 {
                writeln!(self.out)?;
            }
            writeln!(self.out, "Report for Student ID: {}", r.id)?;
            writeln!(self.out, "Name: {}", r.name)?;
            for subject in &r.subjects {
                let scores: Vec<String> = subject.scores.iter().map(|s| s.to_string()).collect();
                writeln!(
                    self.out,
                    "Subject: {}, Grades: {} Average: {}",
                    subject.subject,
                    scores.join(" "),
                    format_average(subject.average)
                )?;
            }
            writeln!(
                self.out,
                "Overall Average Grade: {}",
                format_average(r.overall_average)
            )?;
            writeln!(self.out, "Attendance Dates: {}", r.attendance.join(" "))?;
        }
        Ok(())
    }

    fn averages(&mut self, rows: &[AverageRow]) -> io::Result<()> {
        if rows.is_empty() {
            return writeln!(self.out, "No students available.");
        }
        let mut table = Table::new();
        table.set_header(vec!["ID", "Name", "Overall Average"]);
        for row in rows {
            table.add_row(vec![
                row.id.to_string(),
                row.name.clone(),
                format_average(row.overall_average),
            ]);
        }
        writeln!(self.out, "{table}")
    }

    fn top_student(&mut self, subject: &str, top: Option<&TopStudent>) -> io::Result<()> {
        match top {
            Some(t) => writeln!(
                self.out,
                "Top student in {subject}: ID {}, Name {}, Average Grade: {:.2}",
                t.id, t.name, t.average
            ),
            None => writeln!(self.out, "No grades recorded for subject {subject}"),
        }
    }

    fn below_threshold(&mut self, threshold: i32, hits: &[BelowThreshold]) -> io::Result<()> {
        writeln!(self.out, "Students with grades below {threshold}:")?;
        if hits.is_empty() {
            return writeln!(self.out, "  (none)");
        }
        for h in hits {
            writeln!(
                self.out,
                "  Student ID: {}, Name: {} has a grade below {threshold} in subject {}",
                h.id, h.name, h.subject
            )?;
        }
        Ok(())
    }

    fn summary(&mut self, stats: &SummaryStatistics) -> io::Result<()> {
        writeln!(self.out, "Total number of students: {}", stats.total_students)?;
        writeln!(
            self.out,
            "Average grade across all subjects: {:.2}",
            stats.average_grade_or_zero()
        )?;
        writeln!(
            self.out,
            "Average attendance: {:.2}",
            stats.average_attendance_or_zero()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::Roster;

    fn sample() -> Roster {
        let mut roster = Roster::new();
        roster.add_student(1, "Ann").unwrap();
        roster.add_student(2, "Bo").unwrap();
        roster.add_grades(1, "Math", &[90, 70]).unwrap();
        roster.add_grade(2, "Math", 60).unwrap();
        roster.mark_attendance(1, "2024-01-01").unwrap();
        roster
    }

    fn render(f: impl FnOnce(&mut TextSink<Vec<u8>>) -> io::Result<()>) -> String {
        let mut sink = TextSink::new(Vec::new());
        f(&mut sink).unwrap();
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn average_formatting() {
        assert_eq!(format_average(Some(80.0)), "80.00");
        assert_eq!(format_average(Some(2.0 / 3.0)), "0.67");
        assert_eq!(format_average(None), "n/a");
    }

    #[test]
    fn report_layout() {
        let roster = sample();
        let out = render(|s| s.reports(&[roster.report(1).unwrap()]));
        assert!(out.contains("Report for Student ID: 1"));
        assert!(out.contains("Name: Ann"));
        assert!(out.contains("Subject: Math, Grades: 90 70 Average: 80.00"));
        assert!(out.contains("Overall Average Grade: 80.00"));
        assert!(out.contains("Attendance Dates: 2024-01-01"));
    }

    #[test]
    fn listing_table() {
        let roster = sample();
        let out = render(|s| s.students("All students", &roster.list()));
        assert!(out.starts_with("All students:"));
        assert!(out.contains("Ann"));
        assert!(out.contains("Bo"));

        let out = render(|s| s.students("Search results", &[]));
        assert!(out.contains("(none)"));
    }

    #[test]
    fn top_student_lines() {
        let roster = sample();
        let top = roster.top_student_in_subject("Math");
        let out = render(|s| s.top_student("Math", top.as_ref()));
        assert_eq!(out, "Top student in Math: ID 1, Name Ann, Average Grade: 80.00\n");

        let out = render(|s| s.top_student("Art", None));
        assert_eq!(out, "No grades recorded for subject Art\n");
    }

    #[test]
    fn below_threshold_lines() {
        let roster = sample();
        let out = render(|s| s.below_threshold(65, &roster.below_threshold(65)));
        assert!(out.contains("Student ID: 2, Name: Bo has a grade below 65 in subject Math"));
        assert!(!out.contains("Student ID: 1"));
    }

    #[test]
    fn summary_lines() {
        let out = render(|s| s.summary(&sample().summary_statistics()));
        assert_eq!(
            out,
            "Total number of students: 2\n\
             Average grade across all subjects: 73.33\n\
             Average attendance: 0.50\n"
        );
    }

    #[test]
    fn empty_roster_messages() {
        let roster = Roster::new();
        assert_eq!(render(|s| s.reports(&roster.reports())), "No students available.\n");
        assert_eq!(
            render(|s| s.averages(&roster.overall_averages())),
            "No students available.\n"
        );
    }
}
