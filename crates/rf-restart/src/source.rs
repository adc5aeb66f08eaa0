//! Read-side contract shared by on-disk and in-memory containers.

use crate::error::RestartResult;
use crate::keyword::KeywordData;

/// Keyword-indexed access to the report blocks of a restart container.
///
/// A report block starts at a `SEQNUM` keyword. Grid 0 is the main grid:
/// every keyword of the block outside an `LGR`/`ENDLGR` frame. Grid N is
/// the N-th such frame. A grid need not carry every keyword.
pub trait RestartSource {
    /// Report steps present, in container order.
    fn report_steps(&self) -> Vec<i32>;

    fn has_report_step(&self, report_step: i32) -> bool {
        self.report_steps().contains(&report_step)
    }

    /// Number of occurrences of `keyword` in the block of `report_step`,
    /// across all grids.
    fn occurrences(&self, keyword: &str, report_step: i32) -> usize;

    /// Main grid plus local grid sections in the block of `report_step`;
    /// 0 when the step is absent.
    fn grid_count(&self, report_step: i32) -> usize;

    /// Data of the first `keyword` inside grid `grid_index` of the block of
    /// `report_step`, or `None` when the step, the grid or the keyword is
    /// absent.
    fn fetch(
        &self,
        keyword: &str,
        grid_index: usize,
        report_step: i32,
    ) -> RestartResult<Option<KeywordData>>;
}

impl<S: RestartSource + ?Sized> RestartSource for &S {
    fn report_steps(&self) -> Vec<i32> {
        (**self).report_steps()
    }

    fn has_report_step(&self, report_step: i32) -> bool {
        (**self).has_report_step(report_step)
    }

    fn occurrences(&self, keyword: &str, report_step: i32) -> usize {
        (**self).occurrences(keyword, report_step)
    }

    fn grid_count(&self, report_step: i32) -> usize {
        (**self).grid_count(report_step)
    }

    fn fetch(
        &self,
        keyword: &str,
        grid_index: usize,
        report_step: i32,
    ) -> RestartResult<Option<KeywordData>> {
        (**self).fetch(keyword, grid_index, report_step)
    }
}
