use csv::ByteRecord;
use std::ffi::{OsStr, OsString};
use std::num::NonZeroUsize;

/// Inclusive, 1-based range of data rows held by one output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRange {
    pub index: usize,
    pub start_row: usize,
    pub end_row: usize,
}

impl ChunkRange {
    pub fn row_count(&self) -> usize {
        self.end_row + 1 - self.start_row
    }

    /// `{stem}.{start}-{end}{extension}`, where `extension` carries its own dot.
    pub fn file_name(&self, stem: &OsStr, extension: Option<&OsStr>) -> OsString {
        let mut name = stem.to_os_string();
        name.push(format!(".{}-{}", self.start_row, self.end_row));
        if let Some(ext) = extension {
            name.push(".");
            name.push(ext);
        }
        name
    }
}

#[derive(Debug, Clone)]
pub struct RowChunk {
    pub range: ChunkRange,
    pub rows: Vec<ByteRecord>,
}

/// Buffers rows until `max_lines` are held, then hands them out as a chunk.
pub struct CsvChunker {
    max_lines: usize,
    next_row: usize,
    next_index: usize,
    buffer: Vec<ByteRecord>,
}

impl CsvChunker {
    pub fn new(max_lines: NonZeroUsize) -> Self {
        let max_lines = max_lines.get();
        Self {
            max_lines,
            next_row: 1,
            next_index: 0,
            buffer: Vec::with_capacity(max_lines),
        }
    }

    /// Adds a row and returns the chunk it completes, if any.
    pub fn push(&mut self, row: ByteRecord) -> Option<RowChunk> {
        self.buffer.push(row);
        if self.buffer.len() == self.max_lines {
            self.take_chunk()
        } else {
            None
        }
    }

    /// Flushes the trailing partial chunk.
    pub fn finish(&mut self) -> Option<RowChunk> {
        self.take_chunk()
    }

    fn take_chunk(&mut self) -> Option<RowChunk> {
        if self.buffer.is_empty() {
            return None;
        }

        let rows = std::mem::replace(&mut self.buffer, Vec::with_capacity(self.max_lines));
        let range = ChunkRange {
            index: self.next_index,
            start_row: self.next_row,
            end_row: self.next_row + rows.len() - 1,
        };
        self.next_row = range.end_row + 1;
        self.next_index += 1;

        Some(RowChunk { range, rows })
    }
}

/// Ranges a run over `total_rows` data rows would produce.
pub fn calculate_ranges(total_rows: usize, max_lines: NonZeroUsize) -> Vec<ChunkRange> {
    let max_lines = max_lines.get();
    let mut ranges = Vec::with_capacity(total_rows.div_ceil(max_lines));
    let mut current_start = 1;
    let mut chunk_index = 0;

    while current_start <= total_rows {
        let end_row = (current_start + max_lines - 1).min(total_rows);
        ranges.push(ChunkRange {
            index: chunk_index,
            start_row: current_start,
            end_row,
        });

        current_start = end_row + 1;
        chunk_index += 1;
    }

    ranges
}
