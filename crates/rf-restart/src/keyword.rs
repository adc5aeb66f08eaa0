//! Keyword types and typed keyword data.

use core::fmt;

use crate::error::{RestartError, RestartResult};

/// Maximum keyword name length in bytes.
pub const NAME_LEN: usize = 8;

/// Width of a `CHAR` element in bytes.
pub const CHAR_WIDTH: usize = 8;

/// Elements per data record for numeric and logical keywords.
pub const NUMERIC_BLOCK: usize = 1000;

/// Elements per data record for character keywords.
pub const CHAR_BLOCK: usize = 105;

/// Element type of a keyword, as tagged in its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordType {
    /// 32-bit signed integers (`INTE`).
    Inte,
    /// 32-bit floats (`REAL`).
    Real,
    /// 64-bit floats (`DOUB`).
    Doub,
    /// Logicals stored as 32-bit integers (`LOGI`).
    Logi,
    /// 8-byte strings (`CHAR`).
    Char,
    /// Strings of the given width (`C0nn`).
    Cnnn(u16),
    /// Header-only marker keyword (`MESS`).
    Mess,
}

impl KeywordType {
    /// Parse the 4-byte tag from a keyword header.
    pub fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"INTE" => Some(Self::Inte),
            b"REAL" => Some(Self::Real),
            b"DOUB" => Some(Self::Doub),
            b"LOGI" => Some(Self::Logi),
            b"CHAR" => Some(Self::Char),
            b"MESS" => Some(Self::Mess),
            [b'C', digits @ ..] if digits.len() == 3 && digits.iter().all(u8::is_ascii_digit) => {
                let width = digits
                    .iter()
                    .fold(0u16, |acc, d| acc * 10 + u16::from(d - b'0'));
                (width > 0).then_some(Self::Cnnn(width))
            }
            _ => None,
        }
    }

    pub fn tag(self) -> [u8; 4] {
        match self {
            Self::Inte => *b"INTE",
            Self::Real => *b"REAL",
            Self::Doub => *b"DOUB",
            Self::Logi => *b"LOGI",
            Self::Char => *b"CHAR",
            Self::Mess => *b"MESS",
            Self::Cnnn(width) => {
                let w = width.min(999);
                [
                    b'C',
                    b'0' + (w / 100) as u8,
                    b'0' + (w / 10 % 10) as u8,
                    b'0' + (w % 10) as u8,
                ]
            }
        }
    }

    /// Size of one element in bytes.
    pub fn element_size(self) -> usize {
        match self {
            Self::Inte | Self::Real | Self::Logi => 4,
            Self::Doub => 8,
            Self::Char => CHAR_WIDTH,
            Self::Cnnn(width) => usize::from(width),
            Self::Mess => 0,
        }
    }

    /// Maximum number of elements in one data record.
    pub fn block_len(self) -> usize {
        match self {
            Self::Char | Self::Cnnn(_) => CHAR_BLOCK,
            _ => NUMERIC_BLOCK,
        }
    }

    fn is_string(self) -> bool {
        matches!(self, Self::Char | Self::Cnnn(_))
    }
}

impl fmt::Display for KeywordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self.tag();
        write!(f, "{}", String::from_utf8_lossy(&tag))
    }
}

/// Decoded keyword payload.
///
/// String elements are stored without their trailing space padding.
#[derive(Debug, Clone, PartialEq)]
pub enum KeywordData {
    Int(Vec<i32>),
    Real(Vec<f32>),
    Double(Vec<f64>),
    Logical(Vec<bool>),
    Char(Vec<String>),
    Message,
}

impl KeywordData {
    /// Empty payload for a keyword of `kind`, with room for `count` elements.
    pub fn with_capacity(kind: KeywordType, count: usize) -> Self {
        match kind {
            KeywordType::Inte => Self::Int(Vec::with_capacity(count)),
            KeywordType::Real => Self::Real(Vec::with_capacity(count)),
            KeywordType::Doub => Self::Double(Vec::with_capacity(count)),
            KeywordType::Logi => Self::Logical(Vec::with_capacity(count)),
            KeywordType::Char | KeywordType::Cnnn(_) => Self::Char(Vec::with_capacity(count)),
            KeywordType::Mess => Self::Message,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Int(v) => v.len(),
            Self::Real(v) => v.len(),
            Self::Double(v) => v.len(),
            Self::Logical(v) => v.len(),
            Self::Char(v) => v.len(),
            Self::Message => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short type name for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "INTE",
            Self::Real(_) => "REAL",
            Self::Double(_) => "DOUB",
            Self::Logical(_) => "LOGI",
            Self::Char(_) => "CHAR",
            Self::Message => "MESS",
        }
    }

    fn matches(&self, kind: KeywordType) -> bool {
        matches!(
            (self, kind),
            (Self::Int(_), KeywordType::Inte)
                | (Self::Real(_), KeywordType::Real)
                | (Self::Double(_), KeywordType::Doub)
                | (Self::Logical(_), KeywordType::Logi)
                | (Self::Char(_), KeywordType::Char | KeywordType::Cnnn(_))
                | (Self::Message, KeywordType::Mess)
        )
    }
}

/// A named keyword with its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    name: String,
    kind: KeywordType,
    data: KeywordData,
}

impl Keyword {
    /// Build a keyword, checking that the name and payload fit the format.
    pub fn new(name: &str, kind: KeywordType, data: KeywordData) -> RestartResult<Self> {
        let invalid = |detail: String| RestartError::InvalidKeyword {
            name: name.to_string(),
            detail,
        };
        if name.is_empty() || name.len() > NAME_LEN || !name.is_ascii() {
            return Err(invalid(format!(
                "name must be 1..={NAME_LEN} ASCII characters"
            )));
        }
        if !data.matches(kind) {
            return Err(invalid(format!(
                "{} payload cannot be stored as {kind}",
                data.type_name()
            )));
        }
        if let KeywordData::Char(values) = &data {
            let width = kind.element_size();
            if let Some(bad) = values.iter().find(|s| s.len() > width || !s.is_ascii()) {
                return Err(invalid(format!(
                    "string '{bad}' does not fit {width} ASCII bytes"
                )));
            }
        }
        if kind.is_string() && kind.element_size() == 0 {
            return Err(invalid("zero-width string type".to_string()));
        }
        Ok(Self {
            name: name.trim_end().to_string(),
            kind,
            data,
        })
    }

    pub fn int(name: &str, values: Vec<i32>) -> RestartResult<Self> {
        Self::new(name, KeywordType::Inte, KeywordData::Int(values))
    }

    pub fn real(name: &str, values: Vec<f32>) -> RestartResult<Self> {
        Self::new(name, KeywordType::Real, KeywordData::Real(values))
    }

    pub fn double(name: &str, values: Vec<f64>) -> RestartResult<Self> {
        Self::new(name, KeywordType::Doub, KeywordData::Double(values))
    }

    pub fn logical(name: &str, values: Vec<bool>) -> RestartResult<Self> {
        Self::new(name, KeywordType::Logi, KeywordData::Logical(values))
    }

    /// 8-byte `CHAR` strings.
    pub fn chars<S: Into<String>>(name: &str, values: impl IntoIterator<Item = S>) -> RestartResult<Self> {
        let values = values.into_iter().map(Into::into).collect();
        Self::new(name, KeywordType::Char, KeywordData::Char(values))
    }

    pub fn message(name: &str) -> RestartResult<Self> {
        Self::new(name, KeywordType::Mess, KeywordData::Message)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> KeywordType {
        self.kind
    }

    pub fn data(&self) -> &KeywordData {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_data(self) -> KeywordData {
        self.data
    }
}

/// The `SEQNUM` keyword that opens the block of `report_step`.
pub(crate) fn seqnum(report_step: i32) -> Keyword {
    Keyword {
        name: crate::SEQNUM.to_string(),
        kind: KeywordType::Inte,
        data: KeywordData::Int(vec![report_step]),
    }
}

/// Compare a stored (possibly padded) keyword name with a requested one.
pub(crate) fn name_matches(stored: &str, requested: &str) -> bool {
    stored.trim_end() == requested.trim_end()
}
