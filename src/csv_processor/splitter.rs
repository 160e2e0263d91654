use crate::csv_processor::chunker::{calculate_ranges, ChunkRange, CsvChunker, RowChunk};
use crate::csv_processor::reader::CsvStreamReader;
use crate::csv_processor::writer::CsvStreamWriter;
use crate::utils::{CsvFormat, Result, SplitterError};
use csv::ByteRecord;
use std::ffi::OsString;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// How a run ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitOutcome<T> {
    /// The input holds no record, not even a header.
    EmptyInput,
    /// The input holds a header and nothing else.
    NoDataRows,
    Completed(T),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub path: PathBuf,
    pub range: ChunkRange,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitReport {
    pub files: Vec<OutputFile>,
    pub total_rows: usize,
}

impl SplitReport {
    pub fn files_created(&self) -> usize {
        self.files.len()
    }
}

/// Files a run would create, without touching the disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPlan {
    pub files: Vec<OutputFile>,
    pub total_rows: usize,
}

/// Splits one delimited file into files of at most `max_lines` data rows,
/// each repeating the header and named after the rows it holds.
#[derive(Debug, Clone)]
pub struct CsvSplitter {
    input: PathBuf,
    max_lines: NonZeroUsize,
    format: CsvFormat,
    output_dir: PathBuf,
    stem: OsString,
    extension: Option<OsString>,
}

impl CsvSplitter {
    /// Checks the input path, then the row limit, in that order.
    pub fn new(input: impl Into<PathBuf>, max_lines: i64, format: CsvFormat) -> Result<Self> {
        let input = input.into();

        if !input.exists() {
            return Err(SplitterError::NotFound(input));
        }
        if !input.is_file() {
            return Err(SplitterError::NotAFile(input));
        }

        let max_lines = usize::try_from(max_lines)
            .ok()
            .and_then(NonZeroUsize::new)
            .ok_or_else(|| {
                SplitterError::InvalidArgument("--max-lines must be a positive integer".to_string())
            })?;

        format.validate()?;

        let stem = input
            .file_stem()
            .ok_or_else(|| SplitterError::NotAFile(input.clone()))?
            .to_os_string();
        let extension = input.extension().map(|e| e.to_os_string());
        let output_dir = input.parent().map(Path::to_path_buf).unwrap_or_default();

        Ok(Self {
            input,
            max_lines,
            format,
            output_dir,
            stem,
            extension,
        })
    }

    pub fn output_path(&self, range: &ChunkRange) -> PathBuf {
        self.output_dir.join(range.file_name(&self.stem, self.extension.as_deref()))
    }

    /// Runs the split. `on_created` is called once per output file, after the
    /// file is complete on disk.
    pub fn split<F>(&self, mut on_created: F) -> Result<SplitOutcome<SplitReport>>
    where
        F: FnMut(&OutputFile),
    {
        debug!(input = %self.input.display(), max_lines = self.max_lines.get(), "Starting split");

        let mut reader = CsvStreamReader::open(&self.input, &self.format)?;
        let Some(headers) = reader.read_headers()? else {
            info!(input = %self.input.display(), "Input file is empty");
            return Ok(SplitOutcome::EmptyInput);
        };

        let utf8_bom = reader.has_utf8_bom();
        let mut chunker = CsvChunker::new(self.max_lines);
        let mut report = SplitReport::default();

        for record in reader.iter_records() {
            if let Some(chunk) = chunker.push(record?) {
                let file = self.write_chunk(&headers, utf8_bom, chunk)?;
                on_created(&file);
                report.files.push(file);
            }
        }
        if let Some(chunk) = chunker.finish() {
            let file = self.write_chunk(&headers, utf8_bom, chunk)?;
            on_created(&file);
            report.files.push(file);
        }
        report.total_rows = reader.rows_read();

        if report.files.is_empty() {
            info!(input = %self.input.display(), "No data rows found");
            return Ok(SplitOutcome::NoDataRows);
        }

        info!(
            input = %self.input.display(),
            files_created = report.files_created(),
            total_rows = report.total_rows,
            "Split complete"
        );
        Ok(SplitOutcome::Completed(report))
    }

    /// Counts the data rows and returns the files `split` would create.
    pub fn plan(&self) -> Result<SplitOutcome<SplitPlan>> {
        let mut reader = CsvStreamReader::open(&self.input, &self.format)?;
        if reader.read_headers()?.is_none() {
            return Ok(SplitOutcome::EmptyInput);
        }

        let total_rows = reader.count_rows()?;
        if total_rows == 0 {
            return Ok(SplitOutcome::NoDataRows);
        }

        let files = calculate_ranges(total_rows, self.max_lines)
            .into_iter()
            .map(|range| OutputFile {
                path: self.output_path(&range),
                range,
            })
            .collect();

        Ok(SplitOutcome::Completed(SplitPlan { files, total_rows }))
    }

    fn write_chunk(
        &self,
        headers: &ByteRecord,
        utf8_bom: bool,
        chunk: RowChunk,
    ) -> Result<OutputFile> {
        let path = self.output_path(&chunk.range);

        let mut writer =
            CsvStreamWriter::new(&path, headers.clone(), self.format).with_utf8_bom(utf8_bom);
        writer.initialize()?;
        writer.write_rows(&chunk.rows)?;
        debug!(path = %writer.path().display(), "Flushing chunk");
        let rows = writer.finish()?;

        info!(
            path = %path.display(),
            start_row = chunk.range.start_row,
            end_row = chunk.range.end_row,
            rows,
            "Wrote chunk"
        );

        Ok(OutputFile {
            path,
            range: chunk.range,
        })
    }
}
