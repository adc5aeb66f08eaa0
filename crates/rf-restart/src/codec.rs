//! Record framing and element encoding.
//!
//! Every record is framed by a leading and trailing big-endian `i32`
//! byte count, as produced by Fortran sequential unformatted I/O. All
//! element values are big-endian as well.

use std::io::{ErrorKind, Read, Write};
use std::ops::Range;

use crate::error::{RestartError, RestartResult, malformed};
use crate::keyword::{KeywordData, KeywordType, NAME_LEN};

/// Payload length of a keyword header record.
pub const HEADER_LEN: usize = 16;

/// Length of one record marker.
pub const MARKER_LEN: u64 = 4;

/// Stored logical `true`.
const LOGICAL_TRUE: i32 = -1;

/// Total on-disk length of a record with a payload of `payload_len` bytes.
pub fn record_len(payload_len: usize) -> u64 {
    payload_len as u64 + 2 * MARKER_LEN
}

fn decode_marker(buf: [u8; 4], offset: u64) -> RestartResult<usize> {
    let len = i32::from_be_bytes(buf);
    usize::try_from(len).map_err(|_| malformed(offset, format!("negative record length {len}")))
}

fn read_exact_at(
    r: &mut dyn Read,
    buf: &mut [u8],
    offset: u64,
    what: &'static str,
) -> RestartResult<()> {
    r.read_exact(buf).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            malformed(offset, what)
        } else {
            RestartError::Io(e)
        }
    })
}

/// Read the leading marker of the next record, or `None` at a clean end of input.
pub fn read_leading_marker(r: &mut dyn Read, offset: u64) -> RestartResult<Option<usize>> {
    let mut buf = [0u8; 4];
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    match filled {
        0 => Ok(None),
        4 => decode_marker(buf, offset).map(Some),
        _ => Err(malformed(offset, "truncated record marker")),
    }
}

/// Read a trailing marker and check it against the leading one.
pub fn read_trailing_marker(r: &mut dyn Read, expected: usize, offset: u64) -> RestartResult<()> {
    let mut buf = [0u8; 4];
    read_exact_at(r, &mut buf, offset, "truncated trailing record marker")?;
    let len = decode_marker(buf, offset)?;
    if len != expected {
        return Err(malformed(
            offset,
            format!("record markers disagree: leading {expected}, trailing {len}"),
        ));
    }
    Ok(())
}

/// Read one record payload starting at `offset`, or `None` at end of input.
pub fn read_record(r: &mut dyn Read, offset: u64) -> RestartResult<Option<Vec<u8>>> {
    let Some(len) = read_leading_marker(r, offset)? else {
        return Ok(None);
    };
    // Bounded by what the input actually holds, not by the marker.
    let mut payload = Vec::new();
    Read::take(&mut *r, len as u64).read_to_end(&mut payload)?;
    if payload.len() != len {
        return Err(malformed(offset, "truncated record payload"));
    }
    read_trailing_marker(r, len, offset + MARKER_LEN + len as u64)?;
    Ok(Some(payload))
}

/// Read a record that must be present.
pub fn expect_record(r: &mut dyn Read, offset: u64) -> RestartResult<Vec<u8>> {
    read_record(r, offset)?.ok_or_else(|| malformed(offset, "unexpected end of file"))
}

/// Write one framed record.
pub fn write_record(w: &mut dyn Write, payload: &[u8]) -> RestartResult<()> {
    let len = i32::try_from(payload.len()).map_err(|_| {
        RestartError::Io(std::io::Error::new(
            ErrorKind::InvalidInput,
            "record payload exceeds i32::MAX bytes",
        ))
    })?;
    w.write_all(&len.to_be_bytes())?;
    w.write_all(payload)?;
    w.write_all(&len.to_be_bytes())?;
    Ok(())
}

/// Decoded keyword header record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHeader {
    pub name: String,
    pub count: usize,
    pub kind: KeywordType,
}

pub fn decode_header(payload: &[u8], offset: u64) -> RestartResult<RawHeader> {
    if payload.len() != HEADER_LEN {
        return Err(malformed(
            offset,
            format!(
                "keyword header is {} bytes, expected {HEADER_LEN}",
                payload.len()
            ),
        ));
    }
    let name = String::from_utf8_lossy(&payload[..NAME_LEN])
        .trim_end()
        .to_string();
    let count = i32::from_be_bytes([payload[8], payload[9], payload[10], payload[11]]);
    let count = usize::try_from(count)
        .map_err(|_| malformed(offset, format!("negative element count {count} for {name}")))?;
    let tag = &payload[12..16];
    let kind = KeywordType::from_tag(tag).ok_or_else(|| RestartError::UnknownType {
        tag: String::from_utf8_lossy(tag).into_owned(),
        offset,
    })?;
    if kind == KeywordType::Mess && count != 0 {
        return Err(malformed(offset, format!("MESS keyword {name} has {count} elements")));
    }
    Ok(RawHeader { name, count, kind })
}

pub fn encode_header(name: &str, count: usize, kind: KeywordType) -> RestartResult<[u8; HEADER_LEN]> {
    if name.len() > NAME_LEN {
        return Err(RestartError::InvalidKeyword {
            name: name.to_string(),
            detail: format!("name longer than {NAME_LEN} bytes"),
        });
    }
    let count = i32::try_from(count).map_err(|_| RestartError::InvalidKeyword {
        name: name.to_string(),
        detail: format!("{count} elements exceed i32::MAX"),
    })?;
    let mut out = [b' '; HEADER_LEN];
    out[..name.len()].copy_from_slice(name.as_bytes());
    out[8..12].copy_from_slice(&count.to_be_bytes());
    out[12..16].copy_from_slice(&kind.tag());
    Ok(out)
}

/// Element counts of the data records that follow a header.
pub fn block_counts(kind: KeywordType, count: usize) -> impl Iterator<Item = usize> {
    let block = kind.block_len();
    let blocks = if kind == KeywordType::Mess {
        0
    } else {
        count.div_ceil(block)
    };
    (0..blocks).map(move |b| block.min(count - b * block))
}

/// Decode one data record and append its elements to `out`.
///
/// `expected` is the element count this record must hold.
pub fn decode_block(
    kind: KeywordType,
    payload: &[u8],
    expected: usize,
    offset: u64,
    out: &mut KeywordData,
) -> RestartResult<()> {
    let size = kind.element_size();
    if payload.len() != expected * size {
        return Err(malformed(
            offset,
            format!(
                "data record is {} bytes, expected {} ({expected} x {size})",
                payload.len(),
                expected * size
            ),
        ));
    }
    let chunks = payload.chunks_exact(size.max(1));
    match out {
        KeywordData::Int(v) => {
            v.extend(chunks.map(|c| i32::from_be_bytes([c[0], c[1], c[2], c[3]])));
        }
        KeywordData::Real(v) => {
            v.extend(chunks.map(|c| f32::from_be_bytes([c[0], c[1], c[2], c[3]])));
        }
        KeywordData::Double(v) => {
            v.extend(chunks.map(|c| {
                f64::from_be_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]])
            }));
        }
        KeywordData::Logical(v) => {
            v.extend(chunks.map(|c| i32::from_be_bytes([c[0], c[1], c[2], c[3]]) != 0));
        }
        KeywordData::Char(v) => {
            v.extend(chunks.map(|c| String::from_utf8_lossy(c).trim_end().to_string()));
        }
        KeywordData::Message => {}
    }
    Ok(())
}

/// Encode the elements in `range` as one data record payload.
pub fn encode_block(kind: KeywordType, data: &KeywordData, range: Range<usize>) -> Vec<u8> {
    let mut out = Vec::with_capacity(range.len() * kind.element_size());
    match data {
        KeywordData::Int(v) => v[range].iter().for_each(|x| out.extend(x.to_be_bytes())),
        KeywordData::Real(v) => v[range].iter().for_each(|x| out.extend(x.to_be_bytes())),
        KeywordData::Double(v) => v[range].iter().for_each(|x| out.extend(x.to_be_bytes())),
        KeywordData::Logical(v) => v[range].iter().for_each(|&x| {
            let raw = if x { LOGICAL_TRUE } else { 0 };
            out.extend(raw.to_be_bytes());
        }),
        KeywordData::Char(v) => {
            let width = kind.element_size();
            for s in &v[range] {
                out.extend(s.as_bytes());
                out.extend(std::iter::repeat_n(b' ', width - s.len()));
            }
        }
        KeywordData::Message => {}
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_framing_round_trip() {
        let mut buf = Vec::new();
        write_record(&mut buf, b"abc").unwrap();
        assert_eq!(buf, [0, 0, 0, 3, b'a', b'b', b'c', 0, 0, 0, 3]);

        let payload = read_record(&mut buf.as_slice(), 0).unwrap().unwrap();
        assert_eq!(payload, b"abc");
    }

    #[test]
    fn empty_input_is_clean_eof() {
        assert!(read_record(&mut [].as_slice(), 0).unwrap().is_none());
    }

    #[test]
    fn mismatched_markers_rejected() {
        let bytes = [0, 0, 0, 2, 1, 2, 0, 0, 0, 3];
        let err = read_record(&mut bytes.as_slice(), 0).unwrap_err();
        assert!(err.to_string().contains("markers disagree"));
    }

    #[test]
    fn truncated_payload_rejected() {
        let bytes = [0, 0, 0, 8, 1, 2];
        let err = read_record(&mut bytes.as_slice(), 0).unwrap_err();
        assert!(matches!(err, RestartError::MalformedRecord { offset: 0, .. }));
    }

    #[test]
    fn header_layout() {
        let raw = encode_header("ZWEL", 3, KeywordType::Char).unwrap();
        assert_eq!(&raw[..8], b"ZWEL    ");
        assert_eq!(&raw[8..12], &3i32.to_be_bytes());
        assert_eq!(&raw[12..], b"CHAR");

        let header = decode_header(&raw, 0).unwrap();
        assert_eq!(header.name, "ZWEL");
        assert_eq!(header.count, 3);
        assert_eq!(header.kind, KeywordType::Char);
    }

    #[test]
    fn header_with_negative_count_rejected() {
        let mut raw = encode_header("IWEL", 0, KeywordType::Inte).unwrap();
        raw[8..12].copy_from_slice(&(-4i32).to_be_bytes());
        assert!(decode_header(&raw, 0).is_err());
    }

    #[test]
    fn blocks_split_at_format_limits() {
        let counts: Vec<_> = block_counts(KeywordType::Doub, 2500).collect();
        assert_eq!(counts, vec![1000, 1000, 500]);

        let counts: Vec<_> = block_counts(KeywordType::Char, 210).collect();
        assert_eq!(counts, vec![105, 105]);

        assert_eq!(block_counts(KeywordType::Inte, 0).count(), 0);
        assert_eq!(block_counts(KeywordType::Mess, 0).count(), 0);
    }

    #[test]
    fn logical_encoding_uses_minus_one() {
        let data = KeywordData::Logical(vec![true, false]);
        let bytes = encode_block(KeywordType::Logi, &data, 0..2);
        assert_eq!(bytes, [0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0]);

        let mut out = KeywordData::with_capacity(KeywordType::Logi, 2);
        decode_block(KeywordType::Logi, &bytes, 2, 0, &mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn char_elements_are_padded_and_trimmed() {
        let data = KeywordData::Char(vec!["P1".into(), "INJ-2".into()]);
        let bytes = encode_block(KeywordType::Char, &data, 0..2);
        assert_eq!(&bytes, b"P1      INJ-2   ");

        let mut out = KeywordData::with_capacity(KeywordType::Char, 2);
        decode_block(KeywordType::Char, &bytes, 2, 0, &mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn short_data_record_rejected() {
        let mut out = KeywordData::with_capacity(KeywordType::Doub, 2);
        let err = decode_block(KeywordType::Doub, &[0u8; 12], 2, 40, &mut out).unwrap_err();
        assert!(matches!(err, RestartError::MalformedRecord { offset: 40, .. }));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Split `data` into data records and decode them back.
    fn through_blocks(kind: KeywordType, data: &KeywordData) -> (Vec<usize>, KeywordData) {
        let counts: Vec<usize> = block_counts(kind, data.len()).collect();
        let mut out = KeywordData::with_capacity(kind, data.len());
        let mut start = 0;
        for &n in &counts {
            let payload = encode_block(kind, data, start..start + n);
            decode_block(kind, &payload, n, 0, &mut out).unwrap();
            start += n;
        }
        (counts, out)
    }

    fn numeric_data() -> impl Strategy<Value = (KeywordType, KeywordData)> {
        let len = 0..2300usize;
        prop_oneof![
            prop::collection::vec(any::<i32>(), len.clone())
                .prop_map(|v| (KeywordType::Inte, KeywordData::Int(v))),
            prop::collection::vec(-1e6f32..1e6, len.clone())
                .prop_map(|v| (KeywordType::Real, KeywordData::Real(v))),
            prop::collection::vec(-1e12f64..1e12, len.clone())
                .prop_map(|v| (KeywordType::Doub, KeywordData::Double(v))),
            prop::collection::vec(any::<bool>(), len)
                .prop_map(|v| (KeywordType::Logi, KeywordData::Logical(v))),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn numeric_blocks_preserve_values((kind, data) in numeric_data()) {
            let (counts, out) = through_blocks(kind, &data);
            prop_assert!(counts.iter().all(|&n| n > 0 && n <= 1000));
            prop_assert_eq!(counts.iter().sum::<usize>(), data.len());
            prop_assert_eq!(out, data);
        }

        #[test]
        fn char_blocks_preserve_names(
            names in prop::collection::vec("[A-Z0-9_-]{0,8}", 0..250usize)
        ) {
            let data = KeywordData::Char(names);
            let (counts, out) = through_blocks(KeywordType::Char, &data);
            prop_assert!(counts.iter().all(|&n| n > 0 && n <= 105));
            prop_assert_eq!(counts.len(), data.len().div_ceil(105));
            prop_assert_eq!(out, data);
        }
    }
}
