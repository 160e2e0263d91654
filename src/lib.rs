pub mod cli;
pub mod csv_processor;
pub mod utils;

pub use csv_processor::{CsvSplitter, OutputFile, SplitOutcome, SplitPlan, SplitReport};
pub use utils::{AppConfig, CsvFormat, Result, SplitterError};
