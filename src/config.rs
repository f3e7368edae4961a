// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::model::{RecurrenceMode, VisibilityOptions};
use anyhow::{Context, Error, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::str::FromStr;

fn default_true() -> bool {
    true
}

fn default_agenda_days() -> u32 {
    7
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(default = "default_true")]
    pub include_overdue: bool,
    #[serde(default = "default_true")]
    pub include_high_priority_without_date: bool,
    #[serde(default)]
    pub include_starting_soon: bool,

    #[serde(default)]
    pub recurrence_mode: RecurrenceMode,

    #[serde(default)]
    pub hide_completed: bool,
    #[serde(default = "default_agenda_days")]
    pub agenda_days: u32,

    #[serde(default = "default_log_level")]
    pub log_level: String, // off, error, warn, info, debug, trace
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // Match the serde defaults
            include_overdue: true,
            include_high_priority_without_date: true,
            include_starting_soon: false,
            recurrence_mode: RecurrenceMode::default(),
            hide_completed: false,
            agenda_days: 7,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn visibility_options(&self) -> VisibilityOptions {
        VisibilityOptions {
            include_overdue: self.include_overdue,
            include_high_priority_without_date: self.include_high_priority_without_date,
            include_starting_soon: self.include_starting_soon,
        }
    }

    /// Unknown level names fall back to Info.
    pub fn log_level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(self.log_level.trim()).unwrap_or(LevelFilter::Info)
    }

    /// Reads `config.toml` from the context's config directory. A missing
    /// file surfaces as an io `NotFound` error, see `is_missing_config_error`.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.config_file()?;
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))
    }

    /// Like `load`, but a missing file yields the defaults. Other failures
    /// (unreadable or malformed file) are still reported.
    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(config) => Ok(config),
            Err(e) if Self::is_missing_config_error(&e) => {
                log::debug!("No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    pub fn is_missing_config_error(err: &Error) -> bool {
        err.chain().any(|cause| {
            cause
                .downcast_ref::<io::Error>()
                .is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
        })
    }

    /// Writes to a sibling temp file first so a crash never leaves a
    /// truncated config behind.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.config_file()?;
        let toml_str = toml::to_string_pretty(self)?;
        let tmp = path.with_extension("toml.tmp");
        fs::write(&tmp, toml_str)
            .with_context(|| format!("Failed to write '{}'", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace config file '{}'", path.display()))?;
        Ok(())
    }
}
