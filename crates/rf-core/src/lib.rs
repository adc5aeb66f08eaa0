//! rf-core: shared foundation for resflow.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + finiteness checks)
//! - cell (Cartesian cell coordinates)
//! - error (shared error types)

pub mod cell;
pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use cell::Ijk;
pub use error::{RfError, RfResult};
pub use numeric::*;
pub use units::*;
