//! Handler configuration
//!
//! Settings come from `lombok.config`-style text (`key = value` lines, `#`
//! comments, `clear key`) and can be overridden from the environment, the
//! same way the compiler reads `TOLC_DEBUG`.

use crate::consts::FLAG_USAGE_ENV;
use crate::error::{Error, Result};
use std::path::Path;
use std::str::FromStr;

const FLAG_USAGE_KEY: &str = "synchronized.flagUsage";

/// How loudly to report any use of a flagged annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagUsage {
    Warning,
    Error,
}

impl FromStr for FlagUsage {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warning" => Ok(FlagUsage::Warning),
            "error" => Ok(FlagUsage::Error),
            other => Err(format!("expected WARNING or ERROR, found '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// `synchronized.flagUsage`: report every `@Synchronized` with this severity
    pub synchronized_flag_usage: Option<FlagUsage>,
}

impl Config {
    pub fn with_flag_usage(mut self, usage: FlagUsage) -> Self {
        self.synchronized_flag_usage = Some(usage);
        self
    }

    /// Parse configuration text. Keys may carry a `lombok.` prefix.
    /// Unknown keys are ignored with a log warning.
    pub fn parse(text: &str) -> Result<Self> {
        let mut config = Config::default();
        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(key) = line.strip_prefix("clear ") {
                config.set(normalize_key(key), None, line_no)?;
                continue;
            }

            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| Error::config_error(line_no, format!("expected 'key = value', found '{}'", line)))?;
            config.set(normalize_key(key), Some(value.trim()), line_no)?;
        }
        Ok(config)
    }

    /// Load and parse a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::debug!("loading handler config from {}", path.as_ref().display());
        Self::parse(&text)
    }

    /// Default configuration with environment overrides applied
    pub fn from_env() -> Result<Self> {
        Config::default().apply_env()
    }

    /// Apply `TOLC_SYNCHRONIZED_FLAG_USAGE` on top of this configuration
    pub fn apply_env(self) -> Result<Self> {
        let value = std::env::var(FLAG_USAGE_ENV).ok();
        self.apply_flag_usage_override(value.as_deref())
    }

    fn apply_flag_usage_override(mut self, value: Option<&str>) -> Result<Self> {
        if let Some(value) = value {
            let usage = value
                .parse::<FlagUsage>()
                .map_err(|e| Error::config_error(0, format!("{}: {}", FLAG_USAGE_ENV, e)))?;
            self.synchronized_flag_usage = Some(usage);
        }
        Ok(self)
    }

    fn set(&mut self, key: &str, value: Option<&str>, line: usize) -> Result<()> {
        match key {
            FLAG_USAGE_KEY => {
                self.synchronized_flag_usage = match value {
                    Some(v) => Some(v.parse().map_err(|e| Error::config_error(line, format!("{}: {}", key, e)))?),
                    None => None,
                };
            }
            other => log::warn!("ignoring unknown config key '{}' at line {}", other, line),
        }
        Ok(())
    }
}

fn normalize_key(key: &str) -> &str {
    let key = key.trim();
    key.strip_prefix("lombok.").unwrap_or(key)
}
