use core::fmt;

use crate::{RfError, RfResult};

const AXES: [&str; 3] = ["cell I", "cell J", "cell K"];

/// Cartesian cell location in a grid, 0-based.
///
/// Restart files store 1-based (Fortran) indices; use
/// [`Ijk::from_one_based`] at the decoding boundary.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ijk(pub [usize; 3]);

impl Ijk {
    pub fn new(i: usize, j: usize, k: usize) -> Self {
        Self([i, j, k])
    }

    /// Convert 1-based stored indices. Every component must be >= 1.
    pub fn from_one_based(raw: [i32; 3]) -> RfResult<Self> {
        let mut out = [0usize; 3];
        for (axis, (&v, slot)) in raw.iter().zip(out.iter_mut()).enumerate() {
            if v < 1 {
                return Err(RfError::IndexOob {
                    what: AXES[axis],
                    index: i64::from(v),
                    len: 0,
                });
            }
            *slot = (v - 1) as usize;
        }
        Ok(Self(out))
    }

    /// Check the cell lies inside a grid of `dims` (NX, NY, NZ).
    pub fn check_within(self, dims: [usize; 3]) -> RfResult<Self> {
        for axis in 0..3 {
            if self.0[axis] >= dims[axis] {
                return Err(RfError::IndexOob {
                    what: AXES[axis],
                    index: self.0[axis] as i64,
                    len: dims[axis],
                });
            }
        }
        Ok(self)
    }

    pub fn i(self) -> usize {
        self.0[0]
    }

    pub fn j(self) -> usize {
        self.0[1]
    }

    pub fn k(self) -> usize {
        self.0[2]
    }
}

impl fmt::Debug for Ijk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ijk({}, {}, {})", self.0[0], self.0[1], self.0[2])
    }
}

impl fmt::Display for Ijk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0[0], self.0[1], self.0[2])
    }
}

impl From<[usize; 3]> for Ijk {
    fn from(v: [usize; 3]) -> Self {
        Self(v)
    }
}
