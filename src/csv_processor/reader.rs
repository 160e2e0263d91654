use crate::utils::{CsvFormat, Result};
use csv::ByteRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Keeps the bytes the parser has pulled but not yet accounted for, so the
/// blank lines and BOM it drops silently can be recovered.
struct RawTap<R> {
    inner: R,
    pending: Vec<u8>,
    base: u64,
}

impl<R: Read> Read for RawTap<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.pending.extend_from_slice(&buf[..n]);
        Ok(n)
    }
}

impl<R> RawTap<R> {
    fn span(&self, start: u64, end: u64) -> &[u8] {
        let from = (start.saturating_sub(self.base) as usize).min(self.pending.len());
        let to = (end.saturating_sub(self.base) as usize).clamp(from, self.pending.len());
        &self.pending[from..to]
    }

    fn release(&mut self, upto: u64) {
        let n = (upto.saturating_sub(self.base) as usize).min(self.pending.len());
        self.pending.drain(..n);
        self.base += n as u64;
    }
}

/// Forward-only reader over a delimited file whose first record is the header.
///
/// Blank lines come back as records with no fields, keeping their place in
/// the row numbering. Field bytes are passed through without UTF-8 decoding.
pub struct CsvStreamReader {
    reader: csv::Reader<RawTap<File>>,
    headers: Option<ByteRecord>,
    blank_lines: usize,
    queued: Option<ByteRecord>,
    exhausted: bool,
    after_cr: bool,
    utf8_bom: bool,
    rows_read: usize,
}

impl CsvStreamReader {
    pub fn open(path: impl AsRef<Path>, format: &CsvFormat) -> Result<Self> {
        let file = File::open(path)?;
        let tap = RawTap {
            inner: file,
            pending: Vec::new(),
            base: 0,
        };
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(format.delimiter_byte())
            .quote(format.quote_byte())
            .from_reader(tap);

        Ok(Self {
            reader,
            headers: None,
            blank_lines: 0,
            queued: None,
            exhausted: false,
            after_cr: false,
            utf8_bom: false,
            rows_read: 0,
        })
    }

    /// Reads the first record. Returns `None` when the file holds no line at all.
    pub fn read_headers(&mut self) -> Result<Option<ByteRecord>> {
        if let Some(headers) = &self.headers {
            return Ok(Some(headers.clone()));
        }

        let Some(record) = self.next_record()? else {
            return Ok(None);
        };
        self.headers = Some(record.clone());
        Ok(Some(record))
    }

    /// Next data record, or `None` at end of input. The header must be read first.
    pub fn next_row(&mut self) -> Result<Option<ByteRecord>> {
        debug_assert!(self.headers.is_some(), "header not read");
        let record = self.next_record()?;
        if record.is_some() {
            self.rows_read += 1;
        }
        Ok(record)
    }

    pub fn iter_records(&mut self) -> CsvRecordIterator<'_> {
        CsvRecordIterator { reader: self }
    }

    /// Consumes the remaining records and returns how many there were.
    pub fn count_rows(&mut self) -> Result<usize> {
        let mut count = 0;
        for record in self.iter_records() {
            record?;
            count += 1;
        }
        Ok(count)
    }

    /// Whether the input starts with a UTF-8 byte order mark. Known once the
    /// header has been read.
    pub fn has_utf8_bom(&self) -> bool {
        self.utf8_bom
    }

    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    fn next_record(&mut self) -> Result<Option<ByteRecord>> {
        loop {
            if self.blank_lines > 0 {
                self.blank_lines -= 1;
                return Ok(Some(ByteRecord::new()));
            }
            if let Some(record) = self.queued.take() {
                return Ok(Some(record));
            }
            if self.exhausted {
                return Ok(None);
            }

            let mut record = ByteRecord::new();
            let found = self.reader.read_byte_record(&mut record)?;
            let start = record.position().map_or(0, |p| p.byte());
            let end = self.reader.position().byte();
            self.account_raw(start, end);

            if found {
                self.queued = Some(record);
            } else {
                self.exhausted = true;
            }
        }
    }

    /// Looks at the raw bytes consumed for one record and counts the blank
    /// lines the parser skipped in front of it.
    fn account_raw(&mut self, start: u64, end: u64) {
        let raw = self.reader.get_ref().span(start, end);
        let mut i = 0;

        if start == 0 && raw.starts_with(UTF8_BOM) {
            self.utf8_bom = true;
            i = UTF8_BOM.len();
        }
        // second half of the previous record's CRLF
        if self.after_cr && raw.get(i) == Some(&b'\n') {
            i += 1;
        }

        let mut blank = 0;
        loop {
            match raw.get(i) {
                Some(b'\r') => {
                    blank += 1;
                    i += 1;
                    if raw.get(i) == Some(&b'\n') {
                        i += 1;
                    }
                }
                Some(b'\n') => {
                    blank += 1;
                    i += 1;
                }
                _ => break,
            }
        }

        self.after_cr = raw.last() == Some(&b'\r');
        self.blank_lines += blank;
        self.reader.get_mut().release(end);
    }
}

pub struct CsvRecordIterator<'a> {
    reader: &'a mut CsvStreamReader,
}

impl Iterator for CsvRecordIterator<'_> {
    type Item = Result<ByteRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next_row().transpose()
    }
}
