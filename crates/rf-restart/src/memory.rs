//! In-memory restart container.

use crate::error::RestartResult;
use crate::grid::GridTracker;
use crate::keyword::{Keyword, KeywordData, name_matches, seqnum};
use crate::source::RestartSource;

/// Keywords of one report step, opened by its `SEQNUM`.
#[derive(Debug, Clone, PartialEq)]
pub struct RestartBlock {
    report_step: i32,
    keywords: Vec<Keyword>,
}

impl RestartBlock {
    pub fn new(report_step: i32) -> Self {
        Self {
            report_step,
            keywords: vec![seqnum(report_step)],
        }
    }

    pub fn report_step(&self) -> i32 {
        self.report_step
    }

    /// Keywords in write order, starting with `SEQNUM`.
    pub fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }

    pub fn push(&mut self, keyword: Keyword) -> &mut Self {
        self.keywords.push(keyword);
        self
    }

    pub fn with(mut self, keyword: Keyword) -> Self {
        self.keywords.push(keyword);
        self
    }

    pub fn extend(&mut self, keywords: impl IntoIterator<Item = Keyword>) -> &mut Self {
        self.keywords.extend(keywords);
        self
    }

    /// Main grid plus local grid sections.
    pub fn grid_count(&self) -> usize {
        let mut grids = GridTracker::default();
        for kw in &self.keywords {
            grids.grid_of(kw.name());
        }
        grids.grid_count()
    }

    fn find(&self, keyword: &str, grid_index: usize) -> Option<&Keyword> {
        let mut grids = GridTracker::default();
        self.keywords
            .iter()
            .find(|kw| grids.grid_of(kw.name()) == grid_index && name_matches(kw.name(), keyword))
    }
}

/// A restart container held entirely in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryRestart {
    blocks: Vec<RestartBlock>,
}

impl MemoryRestart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_blocks(blocks: Vec<RestartBlock>) -> Self {
        Self { blocks }
    }

    pub fn push_block(&mut self, block: RestartBlock) -> &mut Self {
        self.blocks.push(block);
        self
    }

    pub fn blocks(&self) -> &[RestartBlock] {
        &self.blocks
    }

    /// First block for `report_step`.
    pub fn block(&self, report_step: i32) -> Option<&RestartBlock> {
        self.blocks.iter().find(|b| b.report_step == report_step)
    }
}

impl RestartSource for MemoryRestart {
    fn report_steps(&self) -> Vec<i32> {
        self.blocks.iter().map(|b| b.report_step).collect()
    }

    fn occurrences(&self, keyword: &str, report_step: i32) -> usize {
        self.block(report_step).map_or(0, |b| {
            b.keywords
                .iter()
                .filter(|kw| name_matches(kw.name(), keyword))
                .count()
        })
    }

    fn grid_count(&self, report_step: i32) -> usize {
        self.block(report_step).map_or(0, RestartBlock::grid_count)
    }

    fn fetch(
        &self,
        keyword: &str,
        grid_index: usize,
        report_step: i32,
    ) -> RestartResult<Option<KeywordData>> {
        Ok(self
            .block(report_step)
            .and_then(|b| b.find(keyword, grid_index))
            .map(|kw| kw.data().clone()))
    }
}
