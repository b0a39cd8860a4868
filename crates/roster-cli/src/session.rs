//! Per-invocation state: resolved config, data file and the loaded roster.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use roster_core::codec::{self, Dialect, Field};
use roster_core::config::{load_config_from, OutputFormat, RosterConfig};
use roster_core::traits::ReportSink;
use roster_core::{Roster, RosterError};

use crate::GlobalOpts;

pub struct Session {
    pub config: RosterConfig,
    pub data_file: PathBuf,
    pub dialect: Dialect,
    pub output: OutputFormat,
    pub roster: Roster,
}

impl Session {
    /// Resolve options against the config and load the data file.
    ///
    /// A data file that does not exist yet is an empty roster.
    pub fn open(opts: &GlobalOpts) -> Result<Self> {
        let config = load_config_from(opts.config.as_deref())?;
        let data_file = opts
            .data
            .clone()
            .unwrap_or_else(|| config.data_file.clone());
        let dialect = opts.dialect.unwrap_or(config.dialect);
        let output = opts.format.unwrap_or(config.output);

        let roster = if data_file.exists() {
            codec::load(&data_file, dialect)?
        } else {
            info!("{} does not exist, starting empty", data_file.display());
            Roster::new()
        };

        Ok(Self {
            config,
            data_file,
            dialect,
            output,
            roster,
        })
    }

    pub fn save(&self) -> Result<()> {
        codec::save(&self.roster, &self.data_file, self.dialect)?;
        Ok(())
    }

    /// Reject a value the data file could not read back.
    pub fn check(&self, field: Field, value: &str) -> Result<(), RosterError> {
        self.dialect.check(field, value)
    }

    pub fn sink(&self) -> Box<dyn ReportSink> {
        roster_report::sink_for(self.output, io::stdout())
    }
}
