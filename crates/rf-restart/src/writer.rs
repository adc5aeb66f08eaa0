//! Restart container writer.
//!
//! [`RestartWriter`] emits keywords in the unformatted record format read
//! by [`RestartFile`](crate::RestartFile).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::codec::{block_counts, encode_block, encode_header, write_record};
use crate::error::RestartResult;
use crate::keyword::Keyword;
use crate::memory::{MemoryRestart, RestartBlock};

/// Writes keywords to any `Write` sink.
///
/// Generic over `W: Write` so tests can write into a `Vec<u8>` and
/// production code into a `BufWriter<File>`.
pub struct RestartWriter<W: Write> {
    writer: W,
    keywords_written: usize,
}

impl RestartWriter<BufWriter<File>> {
    /// Create (or truncate) a file at `path`.
    pub fn create(path: impl AsRef<Path>) -> RestartResult<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> RestartWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            keywords_written: 0,
        }
    }

    /// Write one keyword: its header record followed by its data records.
    pub fn write_keyword(&mut self, keyword: &Keyword) -> RestartResult<()> {
        let kind = keyword.kind();
        let header = encode_header(keyword.name(), keyword.len(), kind)?;
        write_record(&mut self.writer, &header)?;

        let mut start = 0;
        for n in block_counts(kind, keyword.len()) {
            let payload = encode_block(kind, keyword.data(), start..start + n);
            write_record(&mut self.writer, &payload)?;
            start += n;
        }
        self.keywords_written += 1;
        Ok(())
    }

    /// Write a report block, `SEQNUM` first.
    pub fn write_block(&mut self, block: &RestartBlock) -> RestartResult<()> {
        for keyword in block.keywords() {
            self.write_keyword(keyword)?;
        }
        Ok(())
    }

    /// Write every block of an in-memory container, in order.
    pub fn write_restart(&mut self, restart: &MemoryRestart) -> RestartResult<()> {
        for block in restart.blocks() {
            self.write_block(block)?;
        }
        Ok(())
    }

    pub fn keywords_written(&self) -> usize {
        self.keywords_written
    }

    /// Flush and return the underlying sink.
    pub fn finish(mut self) -> RestartResult<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
