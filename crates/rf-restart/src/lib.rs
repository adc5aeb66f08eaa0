//! rf-restart: keyword-indexed restart containers.
//!
//! Provides:
//! - Unformatted big-endian record codec (Fortran sequential framing)
//! - [`RestartFile`]: lazily decoded on-disk container, indexed by report step
//! - [`MemoryRestart`]: in-memory container with the same read contract
//! - [`RestartWriter`]: writer for the same format
//! - [`RestartSource`]: the read contract consumed by downstream crates

pub mod codec;
pub mod error;
mod grid;
pub mod keyword;
pub mod memory;
pub mod reader;
pub mod source;
pub mod writer;

pub use error::{RestartError, RestartResult};
pub use keyword::{Keyword, KeywordData, KeywordType};
pub use memory::{MemoryRestart, RestartBlock};
pub use reader::{KeywordHeader, RestartFile};
pub use source::RestartSource;
pub use writer::RestartWriter;

/// Keyword that opens every report block; its single integer is the report step.
pub const SEQNUM: &str = "SEQNUM";

/// Keyword that opens a local grid section.
pub const LGR: &str = "LGR";

/// Keyword that closes a local grid section.
pub const ENDLGR: &str = "ENDLGR";
