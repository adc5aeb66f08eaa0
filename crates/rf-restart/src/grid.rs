//! Grid sections of a report block.
//!
//! Keywords outside any `LGR`/`ENDLGR` frame belong to the main grid
//! (index 0). Keywords inside the N-th frame, the frame keywords
//! included, belong to local grid N. A `SEQNUM` starts a new block and
//! resets the numbering.

use crate::keyword::name_matches;
use crate::{ENDLGR, LGR, SEQNUM};

/// Assigns grid indices to keyword names fed in file order.
#[derive(Debug, Clone, Default)]
pub(crate) struct GridTracker {
    current: usize,
    sections: usize,
}

impl GridTracker {
    /// Grid index of the next keyword named `name`.
    pub(crate) fn grid_of(&mut self, name: &str) -> usize {
        if name_matches(name, SEQNUM) {
            *self = Self::default();
            return 0;
        }
        if name_matches(name, LGR) {
            self.sections += 1;
            self.current = self.sections;
            return self.current;
        }
        let grid = self.current;
        if name_matches(name, ENDLGR) {
            self.current = 0;
        }
        grid
    }

    /// Grids seen so far in the current block, main grid included.
    pub(crate) fn grid_count(&self) -> usize {
        self.sections + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grids(names: &[&str]) -> Vec<usize> {
        let mut tracker = GridTracker::default();
        names.iter().map(|n| tracker.grid_of(n)).collect()
    }

    #[test]
    fn frames_number_local_grids() {
        let names = [
            "SEQNUM", "INTEHEAD", "LGR", "INTEHEAD", "ZWEL", "ENDLGR", "PRESSURE", "LGR",
            "INTEHEAD", "ENDLGR",
        ];
        assert_eq!(grids(&names), vec![0, 0, 1, 1, 1, 1, 0, 2, 2, 2]);
    }

    #[test]
    fn unterminated_frame_ends_at_next_frame() {
        assert_eq!(grids(&["INTEHEAD", "LGR", "ZWEL", "LGR", "ZWEL"]), vec![0, 1, 1, 2, 2]);
    }

    #[test]
    fn seqnum_restarts_numbering() {
        let mut tracker = GridTracker::default();
        for name in ["SEQNUM", "LGR", "ENDLGR", "LGR"] {
            tracker.grid_of(name);
        }
        assert_eq!(tracker.grid_count(), 3);
        assert_eq!(tracker.grid_of("SEQNUM"), 0);
        assert_eq!(tracker.grid_of("LGR"), 1);
        assert_eq!(tracker.grid_count(), 2);
    }
}
