pub mod chunker;
pub mod reader;
pub mod splitter;
pub mod writer;

pub use chunker::{calculate_ranges, ChunkRange, CsvChunker, RowChunk};
pub use reader::CsvStreamReader;
pub use splitter::{CsvSplitter, OutputFile, SplitOutcome, SplitPlan, SplitReport};
pub use writer::CsvStreamWriter;
