pub mod config;
pub mod errors;

pub use config::{AppConfig, CsvFormat, LoggingConfig};
pub use errors::{Result, SplitterError};
