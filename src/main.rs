use clap::Parser;
use csv_splitter::cli::Cli;
use csv_splitter::{AppConfig, CsvFormat, CsvSplitter, SplitOutcome, SplitterError};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = AppConfig::load_or_default(Some(cli.config.as_path()));
    let mut config = loaded.as_ref().cloned().unwrap_or_default();
    let level = config.logging.level_filter().unwrap_or(LevelFilter::WARN);

    // stdout carries the user-facing report, logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(format!("csv_splitter={level}").parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = &loaded {
        tracing::warn!(path = %cli.config.display(), error = %e, "Using default configuration");
    }
    if let Some(delimiter) = cli.delimiter {
        config.csv.delimiter = delimiter;
    }

    if let Err(e) = run(&cli, config.csv) {
        println!("Error: {}", e);
        tracing::debug!(error = ?e, "Split aborted");
        std::process::exit(1);
    }

    Ok(())
}

fn run(cli: &Cli, format: CsvFormat) -> Result<(), SplitterError> {
    let splitter = CsvSplitter::new(&cli.input_csv, cli.max_lines, format)?;

    if cli.dry_run {
        return dry_run(&splitter);
    }

    match splitter.split(|file| println!("Created: {}", file.path.display()))? {
        SplitOutcome::EmptyInput => println!("Error: Input file is empty"),
        SplitOutcome::NoDataRows => println!("No data rows found in the input file"),
        SplitOutcome::Completed(report) => {
            println!("Split complete: Created {} files", report.files_created())
        }
    }

    Ok(())
}

fn dry_run(splitter: &CsvSplitter) -> Result<(), SplitterError> {
    match splitter.plan()? {
        SplitOutcome::EmptyInput => println!("Error: Input file is empty"),
        SplitOutcome::NoDataRows => println!("No data rows found in the input file"),
        SplitOutcome::Completed(plan) => {
            for file in &plan.files {
                println!(
                    "Would create: {} ({} rows)",
                    file.path.display(),
                    file.range.row_count()
                );
            }
            println!("Dry run: {} files would be created", plan.files.len());
        }
    }

    Ok(())
}
