//! Flat-text persistence codec.
//!
//! Two dialects share the same delimiter:
//!
//! * [`Dialect::Legacy`]: the plain untagged format. Each student is an
//!   identity line `id,name`, followed by one `subject,score,...` line per
//!   non-empty grade history and one `attendance,date` line per date.
//!   Identity and grade lines carry no tag and are told apart by content,
//!   which makes some rosters unrepresentable (see [`decode`]).
//! * [`Dialect::Tagged`]: every line starts with `student`, `grades` or
//!   `attendance`. Names and dates take the rest of the line, empty names and
//!   empty grade histories survive, and malformed lines are errors.
//!
//! Decoding always builds a fresh [`Roster`]. A numeric parse failure aborts
//! the whole decode and the partial roster is dropped.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{CodecError, PersistError, RosterError};
use crate::model::{Score, Student, StudentId};
use crate::roster::Roster;

/// Field separator. Never escaped.
pub const DELIMITER: char = ',';

/// First field of an attendance line (both dialects).
pub const ATTENDANCE_TAG: &str = "attendance";

/// First field of an identity line (tagged dialect).
pub const STUDENT_TAG: &str = "student";

/// First field of a grade line (tagged dialect).
pub const GRADES_TAG: &str = "grades";

/// Persistence file dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Untagged identity and grade lines, told apart by field content.
    #[default]
    Legacy,
    /// Every line carries an explicit type tag.
    Tagged,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Legacy => write!(f, "legacy"),
            Dialect::Tagged => write!(f, "tagged"),
        }
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "legacy" => Ok(Dialect::Legacy),
            "tagged" | "strict" => Ok(Dialect::Tagged),
            other => Err(format!("unknown dialect: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode the roster, in its current order, to a string.
pub fn encode(roster: &Roster, dialect: Dialect) -> String {
    let mut out = String::new();
    for student in roster {
        encode_student(student, dialect, &mut out);
    }
    out
}

/// Encode the roster to a writer, one student at a time.
pub fn encode_to<W: Write>(
    roster: &Roster,
    dialect: Dialect,
    mut writer: W,
) -> std::io::Result<()> {
    let mut buf = String::new();
    for student in roster {
        buf.clear();
        encode_student(student, dialect, &mut buf);
        writer.write_all(buf.as_bytes())?;
    }
    writer.flush()
}

fn encode_student(student: &Student, dialect: Dialect, out: &mut String) {
    if let Err(e) = check_student(student, dialect) {
        tracing::warn!("{e}; it will not read back");
    }
    match dialect {
        Dialect::Legacy => {
            out.push_str(&format!("{}{DELIMITER}{}\n", student.id(), student.name));
            for (subject, scores) in &student.grades {
                if scores.is_empty() {
                    tracing::debug!(
                        "student ID {}: empty {subject} history is not written",
                        student.id()
                    );
                    continue;
                }
                out.push_str(subject);
                push_scores(scores, out);
                out.push('\n');
            }
        }
        Dialect::Tagged => {
            out.push_str(&format!(
                "{STUDENT_TAG}{DELIMITER}{}{DELIMITER}{}\n",
                student.id(),
                student.name
            ));
            for (subject, scores) in &student.grades {
                out.push_str(GRADES_TAG);
                out.push(DELIMITER);
                out.push_str(subject);
                push_scores(scores, out);
                out.push('\n');
            }
        }
    }
    for date in &student.attendance {
        out.push_str(&format!("{ATTENDANCE_TAG}{DELIMITER}{date}\n"));
    }
}

fn push_scores(scores: &[Score], out: &mut String) {
    for score in scores {
        out.push(DELIMITER);
        out.push_str(&score.to_string());
    }
}

// ---------------------------------------------------------------------------
// Storability
// ---------------------------------------------------------------------------

/// A text value of a student record, as named in [`RosterError::NotStorable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Subject,
    Date,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name => write!(f, "name"),
            Field::Subject => write!(f, "subject"),
            Field::Date => write!(f, "date"),
        }
    }
}

impl Dialect {
    /// `true` if `value`, written as `field`, decodes back unchanged and
    /// without touching neighbouring records.
    pub fn can_store(self, field: Field, value: &str) -> bool {
        if value.contains(['\n', '\r']) {
            return false;
        }
        match (self, field) {
            // Identity lines are recognised by a non-numeric second field.
            (Dialect::Legacy, Field::Name) => {
                !value.is_empty() && !value.contains(DELIMITER) && !is_score_token(value)
            }
            (Dialect::Legacy, Field::Subject) => {
                !value.contains(DELIMITER) && value != ATTENDANCE_TAG
            }
            (Dialect::Legacy, Field::Date) => !value.is_empty() && !value.contains(DELIMITER),
            (Dialect::Tagged, Field::Subject) => !value.is_empty() && !value.contains(DELIMITER),
            (Dialect::Tagged, Field::Name | Field::Date) => true,
        }
    }

    /// Like [`Dialect::can_store`], as a reportable error.
    pub fn check(self, field: Field, value: &str) -> Result<(), RosterError> {
        if self.can_store(field, value) {
            Ok(())
        } else {
            Err(RosterError::NotStorable {
                field,
                value: value.to_string(),
                dialect: self,
            })
        }
    }
}

fn check_student(student: &Student, dialect: Dialect) -> Result<(), RosterError> {
    dialect.check(Field::Name, &student.name)?;
    for subject in student.grades.keys() {
        dialect.check(Field::Subject, subject)?;
    }
    for date in &student.attendance {
        dialect.check(Field::Date, date)?;
    }
    Ok(())
}

/// Check that every value of every student survives a save in `dialect`.
pub fn check_roster(roster: &Roster, dialect: Dialect) -> Result<(), RosterError> {
    roster
        .iter()
        .try_for_each(|student| check_student(student, dialect))
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// One classified input line.
#[derive(Debug, PartialEq)]
enum Line<'a> {
    Skip,
    Identity { id: StudentId, name: &'a str },
    Grades { subject: &'a str, scores: Vec<Score> },
    Attendance { date: &'a str },
}

/// Decode a complete document.
///
/// In the legacy dialect a line is classified as follows, after splitting on
/// the delimiter (a single trailing delimiter yields no trailing field):
///
/// 1. fewer than two fields: skipped;
/// 2. first field `attendance`: the second field is a date for the current
///    student, dropped if there is none;
/// 3. second field empty or not an integer: identity line, the first field
///    is the ID and the second the name;
/// 4. otherwise: grade line, the first field is the subject and every
///    further field a score, dropped if there is no current student.
///
/// An empty name is written as `id,`, which reads back as a single field, so
/// that student vanishes and the lines after it land on the previous
/// student. A name that parses as an integer reads back as a grade line.
pub fn decode(input: &str, dialect: Dialect) -> Result<Roster, CodecError> {
    let mut decoder = Decoder::new(dialect);
    for (idx, line) in input.lines().enumerate() {
        decoder.feed(idx + 1, line)?;
    }
    Ok(decoder.finish())
}

/// Decode from a buffered reader. See [`decode`] for the line rules.
pub fn decode_from<R: BufRead>(reader: R, dialect: Dialect) -> Result<Roster, CodecError> {
    let mut decoder = Decoder::new(dialect);
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        decoder.feed(idx + 1, &line)?;
    }
    Ok(decoder.finish())
}

/// Line-by-line decode state.
struct Decoder {
    dialect: Dialect,
    roster: Roster,
    /// Student that grade and attendance lines attach to.
    current: Option<StudentId>,
    lines: usize,
    skipped: usize,
}

impl Decoder {
    fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            roster: Roster::new(),
            current: None,
            lines: 0,
            skipped: 0,
        }
    }

    fn feed(&mut self, line_no: usize, line: &str) -> Result<(), CodecError> {
        self.lines += 1;
        let parsed = match self.dialect {
            Dialect::Legacy => classify_legacy(line_no, line)?,
            Dialect::Tagged => classify_tagged(line_no, line)?,
        };

        match parsed {
            Line::Skip => {
                tracing::debug!("line {line_no}: skipped");
                self.skipped += 1;
            }
            Line::Identity { id, name } => {
                if self.roster.add_student(id, name).is_ok() {
                    self.current = Some(id);
                } else if self.dialect == Dialect::Tagged {
                    return Err(CodecError::DuplicateId { line: line_no, id });
                } else {
                    tracing::warn!("line {line_no}: duplicate student ID {id}, dropping its lines");
                    self.current = None;
                }
            }
            Line::Grades { subject, scores } => {
                if let Some(student) = self.current_student(line_no, "grade")? {
                    student.add_grades(subject, &scores);
                }
            }
            Line::Attendance { date } => {
                if let Some(student) = self.current_student(line_no, ATTENDANCE_TAG)? {
                    student.mark_attendance(date);
                }
            }
        }
        Ok(())
    }

    /// The current student, or `None` for a fragment that has no owner.
    ///
    /// Ownerless fragments are dropped in the legacy dialect and rejected in
    /// the tagged one.
    fn current_student(
        &mut self,
        line_no: usize,
        kind: &str,
    ) -> Result<Option<&mut Student>, CodecError> {
        let Some(id) = self.current else {
            if self.dialect == Dialect::Tagged {
                return Err(CodecError::Malformed {
                    line: line_no,
                    reason: format!("{kind} line before any student line"),
                });
            }
            tracing::warn!("line {line_no}: {kind} line without a current student, dropped");
            self.skipped += 1;
            return Ok(None);
        };
        Ok(self.roster.student_mut(id))
    }

    fn finish(self) -> Roster {
        tracing::debug!(
            "decoded {} students from {} lines ({} skipped)",
            self.roster.len(),
            self.lines,
            self.skipped
        );
        self.roster
    }
}

/// Split a legacy line the way a delimiter-driven line reader does: a single
/// trailing delimiter does not produce an empty last field.
fn legacy_fields(line: &str) -> Vec<&str> {
    if line.is_empty() {
        return Vec::new();
    }
    let body = line.strip_suffix(DELIMITER).unwrap_or(line);
    body.split(DELIMITER).collect()
}

fn is_score_token(field: &str) -> bool {
    field.trim().parse::<Score>().is_ok()
}

fn parse_id(line: usize, field: &str) -> Result<StudentId, CodecError> {
    field
        .trim()
        .parse()
        .map_err(|_| CodecError::InvalidId {
            line,
            value: field.to_string(),
        })
}

fn parse_scores<'a>(
    line: usize,
    fields: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<Score>, CodecError> {
    fields
        .into_iter()
        .map(|f| {
            f.trim().parse().map_err(|_| CodecError::InvalidScore {
                line,
                value: f.to_string(),
            })
        })
        .collect()
}

fn classify_legacy(line_no: usize, line: &str) -> Result<Line<'_>, CodecError> {
    let fields = legacy_fields(line);
    if fields.len() < 2 {
        return Ok(Line::Skip);
    }
    if fields[0] == ATTENDANCE_TAG {
        return Ok(Line::Attendance { date: fields[1] });
    }
    if fields[1].is_empty() || !is_score_token(fields[1]) {
        if fields.len() > 2 {
            tracing::debug!("line {line_no}: ignoring fields after the name");
        }
        return Ok(Line::Identity {
            id: parse_id(line_no, fields[0])?,
            name: fields[1],
        });
    }
    Ok(Line::Grades {
        subject: fields[0],
        scores: parse_scores(line_no, fields[1..].iter().copied())?,
    })
}

fn classify_tagged(line_no: usize, line: &str) -> Result<Line<'_>, CodecError> {
    if line.trim().is_empty() {
        return Ok(Line::Skip);
    }
    let malformed = |reason: String| CodecError::Malformed {
        line: line_no,
        reason,
    };
    let Some((tag, rest)) = line.split_once(DELIMITER) else {
        return Err(malformed(format!("expected '<tag>{DELIMITER}...', got '{line}'")));
    };

    match tag {
        STUDENT_TAG => {
            let (id, name) = rest.split_once(DELIMITER).unwrap_or((rest, ""));
            Ok(Line::Identity {
                id: parse_id(line_no, id)?,
                name,
            })
        }
        GRADES_TAG => {
            let (subject, scores) = match rest.split_once(DELIMITER) {
                Some((subject, scores)) => {
                    (subject, parse_scores(line_no, scores.split(DELIMITER))?)
                }
                None => (rest, Vec::new()),
            };
            if subject.is_empty() {
                return Err(malformed("grade line without a subject".into()));
            }
            Ok(Line::Grades { subject, scores })
        }
        ATTENDANCE_TAG => Ok(Line::Attendance { date: rest }),
        other => Err(malformed(format!("unknown line tag '{other}'"))),
    }
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// Write the roster to `path`, replacing any existing file.
///
/// The roster goes to a temporary file in the same directory which is then
/// renamed over `path`, so a failed write leaves the old file in place.
pub fn save(roster: &Roster, path: &Path, dialect: Dialect) -> Result<(), PersistError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|source| PersistError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    encode_to(roster, dialect, BufWriter::new(tmp.as_file_mut())).map_err(|source| {
        PersistError::Write {
            path: path.to_path_buf(),
            source,
        }
    })?;
    tmp.persist(path).map_err(|e| PersistError::Write {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    tracing::info!(
        "exported {} students to {} ({dialect})",
        roster.len(),
        path.display()
    );
    Ok(())
}

/// Read a roster from `path`.
pub fn load(path: &Path, dialect: Dialect) -> Result<Roster, PersistError> {
    let file = File::open(path).map_err(|source| PersistError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let roster = decode_from(BufReader::new(file), dialect).map_err(|source| {
        PersistError::Decode {
            path: path.to_path_buf(),
            source,
        }
    })?;
    tracing::info!(
        "imported {} students from {} ({dialect})",
        roster.len(),
        path.display()
    );
    Ok(roster)
}

impl Roster {
    /// Replace this roster with the contents of `path`.
    ///
    /// On any error the roster is left exactly as it was.
    pub fn import_file(&mut self, path: &Path, dialect: Dialect) -> Result<(), PersistError> {
        *self = load(path, dialect)?;
        Ok(())
    }

    pub fn export_file(&self, path: &Path, dialect: Dialect) -> Result<(), PersistError> {
        save(self, path, dialect)
    }
}
