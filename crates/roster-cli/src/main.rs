//! roster CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use roster_core::codec::Dialect;
use roster_core::config::OutputFormat;

mod commands;
mod session;

#[derive(Parser)]
#[command(
    name = "roster",
    version,
    about = "Student grades and attendance roster"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Roster data file (default: `data_file` from config, else roster.txt)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Data file dialect: legacy, tagged
    #[arg(long, global = true)]
    pub dialect: Option<Dialect>,

    /// Output format: text, json
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SortKey {
    Name,
    Id,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new student
    AddStudent {
        id: i64,
        name: String,
    },

    /// Remove a student with all their grades and attendance
    RemoveStudent {
        id: i64,
    },

    /// Change a student's name
    Rename {
        id: i64,
        name: String,
    },

    /// Record one grade
    AddGrade {
        id: i64,
        subject: String,
        #[arg(allow_hyphen_values = true)]
        score: i32,
    },

    /// Record several grades for one subject
    AddGrades {
        id: i64,
        subject: String,
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        scores: Vec<i32>,
    },

    /// Replace the first occurrence of a grade
    UpdateGrade {
        id: i64,
        subject: String,
        #[arg(allow_hyphen_values = true)]
        old: i32,
        #[arg(allow_hyphen_values = true)]
        new: i32,
    },

    /// Remove every occurrence of a grade
    DeleteGrade {
        id: i64,
        subject: String,
        #[arg(allow_hyphen_values = true)]
        score: i32,
    },

    /// Mark a student present
    MarkAttendance {
        id: i64,

        /// Date to record (default: today, in the configured format)
        #[arg(long)]
        date: Option<String>,
    },

    /// Remove every attendance entry for a date
    DeleteAttendance {
        id: i64,
        date: String,
    },

    /// List all students
    List,

    /// Find students by exact name
    Search {
        name: String,
    },

    /// Reorder the roster
    Sort {
        #[arg(long, value_enum, default_value = "name")]
        by: SortKey,
    },

    /// Show the report for one student, or for everyone
    Report {
        id: Option<i64>,
    },

    /// Show each student's overall average
    Averages,

    /// Show the student with the highest average in a subject
    Top {
        subject: String,
    },

    /// Show subjects with a grade below a threshold
    Below {
        /// Threshold (default: `default_threshold` from config)
        #[arg(allow_hyphen_values = true)]
        threshold: Option<i32>,
    },

    /// List students with no grades recorded
    NoGrades,

    /// List students who attended every recorded date
    PerfectAttendance,

    /// Show roster-wide statistics
    Summary,

    /// Replace the roster with the contents of a file
    Import {
        file: PathBuf,

        /// Dialect of FILE (default: the data file dialect)
        #[arg(long = "as")]
        file_dialect: Option<Dialect>,
    },

    /// Write the roster to a file
    Export {
        file: PathBuf,

        /// Dialect of FILE (default: the data file dialect)
        #[arg(long = "as")]
        file_dialect: Option<Dialect>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("roster=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = session::Session::open(&cli.global).and_then(|mut session| {
        use commands::{attendance, grades, reports, students, transfer};
        match cli.command {
            Commands::AddStudent { id, name } => students::add(&mut session, id, name),
            Commands::RemoveStudent { id } => students::remove(&mut session, id),
            Commands::Rename { id, name } => students::rename(&mut session, id, name),
            Commands::List => students::list(&session),
            Commands::Search { name } => students::search(&session, &name),
            Commands::Sort { by } => students::sort(&mut session, by),
            Commands::AddGrade { id, subject, score } => {
                grades::add(&mut session, id, &subject, &[score])
            }
            Commands::AddGrades { id, subject, scores } => {
                grades::add(&mut session, id, &subject, &scores)
            }
            Commands::UpdateGrade {
                id,
                subject,
                old,
                new,
            } => grades::update(&mut session, id, &subject, old, new),
            Commands::DeleteGrade { id, subject, score } => {
                grades::delete(&mut session, id, &subject, score)
            }
            Commands::Averages => grades::averages(&session),
            Commands::Top { subject } => grades::top(&session, &subject),
            Commands::Below { threshold } => grades::below(&session, threshold),
            Commands::NoGrades => grades::no_grades(&session),
            Commands::MarkAttendance { id, date } => attendance::mark(&mut session, id, date),
            Commands::DeleteAttendance { id, date } => {
                attendance::delete(&mut session, id, &date)
            }
            Commands::PerfectAttendance => attendance::perfect(&session),
            Commands::Report { id } => reports::report(&session, id),
            Commands::Summary => reports::summary(&session),
            Commands::Import { file, file_dialect } => {
                transfer::import(&mut session, &file, file_dialect)
            }
            Commands::Export { file, file_dialect } => {
                transfer::export(&session, &file, file_dialect)
            }
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
