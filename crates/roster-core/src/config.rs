//! Roster configuration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::clock::{self, DEFAULT_DATE_FORMAT};
use crate::codec::Dialect;
use crate::model::Score;

/// How command output is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// Top-level roster configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Persistence file the CLI loads and saves.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    /// Dialect of the persistence file.
    #[serde(default)]
    pub dialect: Dialect,
    /// `strftime` pattern for "today" when marking attendance.
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Threshold used by `below` when none is given.
    #[serde(default = "default_threshold")]
    pub default_threshold: Score,
    /// Output rendering.
    #[serde(default)]
    pub output: OutputFormat,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("roster.txt")
}
fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}
fn default_threshold() -> Score {
    70
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            dialect: Dialect::default(),
            date_format: default_date_format(),
            default_threshold: default_threshold(),
            output: OutputFormat::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `roster.toml` in the current directory
/// 2. `~/.config/roster/config.toml`
///
/// Environment variable overrides: `ROSTER_DATA_FILE`, `ROSTER_DIALECT`.
pub fn load_config() -> Result<RosterConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<RosterConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("roster.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => RosterConfig::default(),
    };

    // Apply env var overrides
    if let Ok(file) = std::env::var("ROSTER_DATA_FILE") {
        config.data_file = PathBuf::from(file);
    }
    if let Ok(dialect) = std::env::var("ROSTER_DIALECT") {
        config.dialect = dialect
            .parse()
            .map_err(|e: String| anyhow::anyhow!("ROSTER_DIALECT: {e}"))?;
    }

    config.data_file = PathBuf::from(resolve_env_vars(&config.data_file.to_string_lossy()));
    Ok(config)
}

/// Parse and check a TOML configuration document.
pub fn parse_config(content: &str) -> Result<RosterConfig> {
    let config: RosterConfig = toml::from_str(content)?;
    anyhow::ensure!(
        clock::is_valid_format(&config.date_format),
        "invalid date_format: '{}'",
        config.date_format
    );
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("roster"))
}
