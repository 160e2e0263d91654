use crate::csv_processor::reader::UTF8_BOM;
use crate::utils::{CsvFormat, Result, SplitterError};
use csv::{ByteRecord, QuoteStyle, Writer};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes one output file: the header followed by data rows.
pub struct CsvStreamWriter {
    path: PathBuf,
    headers: ByteRecord,
    format: CsvFormat,
    utf8_bom: bool,
    writer: Option<Writer<File>>,
    // shares the file offset with `writer`, used for blank lines
    raw: Option<File>,
    rows_written: usize,
}

impl CsvStreamWriter {
    pub fn new(path: impl Into<PathBuf>, headers: ByteRecord, format: CsvFormat) -> Self {
        Self {
            path: path.into(),
            headers,
            format,
            utf8_bom: false,
            writer: None,
            raw: None,
            rows_written: 0,
        }
    }

    /// Starts the file with a UTF-8 byte order mark.
    pub fn with_utf8_bom(mut self, utf8_bom: bool) -> Self {
        self.utf8_bom = utf8_bom;
        self
    }

    /// Creates (or truncates) the file and writes the header.
    pub fn initialize(&mut self) -> Result<()> {
        let mut file = File::create(&self.path)?;
        if self.utf8_bom {
            file.write_all(UTF8_BOM)?;
        }
        self.raw = Some(file.try_clone()?);

        let writer = csv::WriterBuilder::new()
            .flexible(true)
            .delimiter(self.format.delimiter_byte())
            .quote(self.format.quote_byte())
            .quote_style(QuoteStyle::Necessary)
            .from_writer(file);
        self.writer = Some(writer);

        let headers = self.headers.clone();
        self.write_record(&headers)
    }

    pub fn write_row(&mut self, row: &ByteRecord) -> Result<()> {
        self.write_record(row)?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn write_rows(&mut self, rows: &[ByteRecord]) -> Result<()> {
        for row in rows {
            self.write_row(row)?;
        }
        Ok(())
    }

    /// Flushes and closes the file, returning the number of data rows written.
    pub fn finish(mut self) -> Result<usize> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(self.rows_written)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_record(&mut self, record: &ByteRecord) -> Result<()> {
        let (Some(writer), Some(raw)) = (self.writer.as_mut(), self.raw.as_mut()) else {
            return Err(SplitterError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "Writer not initialized",
            )));
        };

        if record.is_empty() {
            // csv would emit `""`; a field-less record is a bare line break
            writer.flush()?;
            raw.write_all(b"\n")?;
        } else {
            writer.write_byte_record(record)?;
        }
        Ok(())
    }
}
