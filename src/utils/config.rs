use crate::utils::errors::{Result, SplitterError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::level_filters::LevelFilter;

pub const DEFAULT_CONFIG_FILE: &str = "csv-splitter.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub csv: CsvFormat,
    pub logging: LoggingConfig,
}

/// Dialect shared by the input reader and every output writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvFormat {
    pub delimiter: char,
    pub quote: char,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for CsvFormat {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl CsvFormat {
    pub fn validate(&self) -> Result<()> {
        ascii_byte("delimiter", self.delimiter)?;
        ascii_byte("quote", self.quote)?;
        if self.delimiter == self.quote {
            return Err(SplitterError::ConfigError(format!(
                "delimiter and quote must differ, both are {:?}",
                self.delimiter
            )));
        }
        Ok(())
    }

    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter as u8
    }

    pub fn quote_byte(&self) -> u8 {
        self.quote as u8
    }
}

impl LoggingConfig {
    /// Accepts the level names `tracing` understands (`trace` through `error`, `off`).
    pub fn level_filter(&self) -> Result<LevelFilter> {
        self.level.parse().map_err(|_| {
            SplitterError::ConfigError(format!("unknown logging level {:?}", self.level))
        })
    }
}

fn ascii_byte(name: &str, c: char) -> Result<u8> {
    if c.is_ascii() && !matches!(c, '\r' | '\n') {
        Ok(c as u8)
    } else {
        Err(SplitterError::ConfigError(format!(
            "{} must be a single ASCII character, got {:?}",
            name, c
        )))
    }
}

impl AppConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| SplitterError::ConfigError(e.to_string()))?;
        let config: Self =
            toml::from_str(&content).map_err(|e| SplitterError::ConfigError(e.to_string()))?;
        config.csv.validate()?;
        config.logging.level_filter()?;
        Ok(config)
    }

    /// Falls back to defaults when the file is absent. A file that exists but
    /// does not parse is still an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) if p.exists() => Self::load_from_file(p),
            _ => Ok(Self::default()),
        }
    }
}
