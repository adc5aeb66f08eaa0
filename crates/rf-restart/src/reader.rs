//! On-disk restart container.
//!
//! [`RestartFile`] indexes every keyword header once at open time,
//! validating all record frames, and decodes keyword data lazily on
//! request.

use std::cell::RefCell;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::ops::Range;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::SEQNUM;
use crate::codec::{
    block_counts, decode_block, decode_header, expect_record, read_leading_marker, read_record,
    read_trailing_marker, record_len, MARKER_LEN,
};
use crate::error::{RestartError, RestartResult, malformed};
use crate::grid::GridTracker;
use crate::keyword::{KeywordData, KeywordType, name_matches};
use crate::source::RestartSource;

/// Location and shape of one keyword in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordHeader {
    pub name: String,
    pub kind: KeywordType,
    pub count: usize,
    /// Grid section within the report block; 0 is the main grid.
    pub grid_index: usize,
    /// Byte offset of the header record.
    pub offset: u64,
    data_offset: u64,
}

#[derive(Debug, Clone)]
struct ReportBlock {
    report_step: i32,
    headers: Range<usize>,
}

/// A restart file opened for reading.
///
/// The file handle is owned for the lifetime of the value and closed on
/// drop. Reads go through a `RefCell`, so a `RestartFile` is not `Sync`;
/// callers that share one across threads must serialise access.
#[derive(Debug)]
pub struct RestartFile {
    path: PathBuf,
    file: RefCell<BufReader<File>>,
    headers: Vec<KeywordHeader>,
    blocks: Vec<ReportBlock>,
}

impl RestartFile {
    /// Open and index a restart file.
    pub fn open(path: impl AsRef<Path>) -> RestartResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut reader = BufReader::new(File::open(&path)?);

        let headers = index_keywords(&mut reader)?;
        let blocks = report_blocks(&mut reader, &headers)?;
        if blocks.is_empty() {
            return Err(RestartError::NoReportSteps);
        }

        debug!(
            path = %path.display(),
            keywords = headers.len(),
            report_steps = blocks.len(),
            "indexed restart file"
        );

        Ok(Self {
            path,
            file: RefCell::new(reader),
            headers,
            blocks,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All keyword headers in file order.
    pub fn headers(&self) -> &[KeywordHeader] {
        &self.headers
    }

    /// Keyword headers of the block of `report_step`, starting with its `SEQNUM`.
    pub fn keywords(&self, report_step: i32) -> Option<&[KeywordHeader]> {
        self.block(report_step)
            .map(|b| &self.headers[b.headers.clone()])
    }

    /// Decode the data of one keyword.
    pub fn read(&self, header: &KeywordHeader) -> RestartResult<KeywordData> {
        let mut reader = self.file.borrow_mut();
        read_data(&mut *reader, header)
    }

    fn block(&self, report_step: i32) -> Option<&ReportBlock> {
        self.blocks.iter().find(|b| b.report_step == report_step)
    }

    fn block_headers<'a>(
        &'a self,
        keyword: &'a str,
        report_step: i32,
    ) -> impl Iterator<Item = &'a KeywordHeader> + 'a {
        self.keywords(report_step)
            .unwrap_or_default()
            .iter()
            .filter(move |h| name_matches(&h.name, keyword))
    }

    /// Grids of the block of `report_step`, main grid included.
    fn block_grid_count(&self, report_step: i32) -> usize {
        self.keywords(report_step)
            .unwrap_or_default()
            .iter()
            .map(|h| h.grid_index + 1)
            .max()
            .unwrap_or(0)
    }
}

impl RestartSource for RestartFile {
    fn report_steps(&self) -> Vec<i32> {
        self.blocks.iter().map(|b| b.report_step).collect()
    }

    fn occurrences(&self, keyword: &str, report_step: i32) -> usize {
        self.block_headers(keyword, report_step).count()
    }

    fn grid_count(&self, report_step: i32) -> usize {
        self.block_grid_count(report_step)
    }

    fn fetch(
        &self,
        keyword: &str,
        grid_index: usize,
        report_step: i32,
    ) -> RestartResult<Option<KeywordData>> {
        match self
            .block_headers(keyword, report_step)
            .find(|h| h.grid_index == grid_index)
        {
            Some(header) => self.read(header).map(Some),
            None => Ok(None),
        }
    }
}

/// Walk the whole file, recording each keyword header and skipping its data.
fn index_keywords<R: Read + Seek>(reader: &mut BufReader<R>) -> RestartResult<Vec<KeywordHeader>> {
    let mut headers = Vec::new();
    let mut grids = GridTracker::default();
    let mut offset = 0u64;

    while let Some(payload) = read_record(reader, offset)? {
        let raw = decode_header(&payload, offset)?;
        let header_offset = offset;
        offset += record_len(payload.len());
        let data_offset = offset;

        for expected in block_counts(raw.kind, raw.count) {
            let len = read_leading_marker(reader, offset)?.ok_or_else(|| {
                malformed(offset, format!("missing data record for {}", raw.name))
            })?;
            let want = expected * raw.kind.element_size();
            if len != want {
                return Err(malformed(
                    offset,
                    format!("data record for {} is {len} bytes, expected {want}", raw.name),
                ));
            }
            reader.seek_relative(len as i64)?;
            read_trailing_marker(reader, len, offset + MARKER_LEN + len as u64)?;
            offset += record_len(len);
        }

        let grid_index = grids.grid_of(&raw.name);
        headers.push(KeywordHeader {
            grid_index,
            name: raw.name,
            kind: raw.kind,
            count: raw.count,
            offset: header_offset,
            data_offset,
        });
    }

    Ok(headers)
}

/// Split the header list into report blocks at each `SEQNUM`.
///
/// Keywords before the first `SEQNUM` belong to no block.
fn report_blocks<R: Read + Seek>(
    reader: &mut BufReader<R>,
    headers: &[KeywordHeader],
) -> RestartResult<Vec<ReportBlock>> {
    let mut blocks: Vec<ReportBlock> = Vec::new();

    for (index, header) in headers.iter().enumerate() {
        if !name_matches(&header.name, SEQNUM) {
            continue;
        }
        let report_step = match read_data(reader, header)? {
            KeywordData::Int(values) if !values.is_empty() => values[0],
            other => {
                return Err(malformed(
                    header.offset,
                    format!(
                        "SEQNUM must hold at least one INTE value, found {} x {}",
                        other.len(),
                        other.type_name()
                    ),
                ));
            }
        };
        if let Some(prev) = blocks.last_mut() {
            prev.headers.end = index;
        }
        blocks.push(ReportBlock {
            report_step,
            headers: index..headers.len(),
        });
    }

    Ok(blocks)
}

fn read_data<R: Read + Seek>(
    reader: &mut BufReader<R>,
    header: &KeywordHeader,
) -> RestartResult<KeywordData> {
    reader.seek(SeekFrom::Start(header.data_offset))?;
    let mut data = KeywordData::with_capacity(header.kind, header.count);
    let mut offset = header.data_offset;
    for expected in block_counts(header.kind, header.count) {
        let payload = expect_record(reader, offset)?;
        decode_block(header.kind, &payload, expected, offset, &mut data)?;
        offset += record_len(payload.len());
    }
    Ok(data)
}
