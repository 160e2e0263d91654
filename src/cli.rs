use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "csv-splitter",
    version,
    about = "Split a CSV file into multiple files with a maximum number of lines each."
)]
pub struct Cli {
    /// Path to the input CSV file
    #[arg(long = "input-csv", value_name = "PATH")]
    pub input_csv: PathBuf,

    /// Maximum number of data rows per output file (excluding header)
    #[arg(long = "max-lines", value_name = "N", allow_negative_numbers = true)]
    pub max_lines: i64,

    /// Field delimiter, overrides the config file
    #[arg(long, value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Configuration file (TOML)
    #[arg(long, value_name = "PATH", default_value = crate::utils::config::DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Print the files that would be created without writing them
    #[arg(long)]
    pub dry_run: bool,
}
