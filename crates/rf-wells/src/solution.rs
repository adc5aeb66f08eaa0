//! Well solution assembly across grids.

use std::path::Path;

use chrono::NaiveDate;
use indexmap::IndexMap;
use rf_restart::{RestartFile, RestartSource};
use tracing::{debug, trace, warn};

use crate::error::{WellError, WellResult};
use crate::fields::FieldLoader;
use crate::layout::{IntHead, UnitSystem, kw};
use crate::options::SolutionOptions;
use crate::table::read_grid_wells;
use crate::types::{Completion, GridWell, WellData};

/// Overview of one report step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepSummary {
    pub report_step: i32,
    pub date: Option<NaiveDate>,
    pub unit_system: UnitSystem,
    /// Main grid plus local grids.
    pub grid_count: usize,
    /// Wells declared in the main grid header.
    pub main_grid_wells: usize,
}

/// Extracts per-well completion rates from a restart container.
///
/// Owns its source for its whole lifetime. Calls are synchronous and
/// read-only; with a [`RestartFile`] source the value is not `Sync`.
#[derive(Debug)]
pub struct WellSolution<S = RestartFile> {
    source: S,
    options: SolutionOptions,
}

impl WellSolution<RestartFile> {
    /// Open a restart file.
    pub fn open(path: impl AsRef<Path>, options: SolutionOptions) -> WellResult<Self> {
        options.validate()?;
        let path = path.as_ref();
        let source = RestartFile::open(path).map_err(|source| WellError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { source, options })
    }
}

impl<S: RestartSource> WellSolution<S> {
    pub fn new(source: S, options: SolutionOptions) -> WellResult<Self> {
        options.validate()?;
        Ok(Self { source, options })
    }

    pub fn options(&self) -> &SolutionOptions {
        &self.options
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn report_steps(&self) -> Vec<i32> {
        self.source.report_steps()
    }

    /// Number of grids at `report_step`: the main grid plus each local
    /// grid section.
    pub fn grid_count(&self, report_step: i32) -> WellResult<usize> {
        self.ensure_step(report_step)?;
        Ok(self.source.grid_count(report_step))
    }

    /// Merged well solution for grids `0..num_grids` at `report_step`.
    ///
    /// Wells are ordered by first appearance (main grid first), and each
    /// well's completions by grid, then by stored order.
    pub fn solution(&self, report_step: i32, num_grids: usize) -> WellResult<Vec<WellData>> {
        if num_grids == 0 {
            return Err(WellError::InvalidArg {
                what: "num_grids must be at least 1".to_string(),
            });
        }
        self.ensure_step(report_step)?;

        let fields = FieldLoader::new(&self.source, report_step);
        let mut merged: IndexMap<String, WellData> = IndexMap::new();

        for grid_index in 0..num_grids {
            let wells = read_grid_wells(&fields, grid_index).map_err(|err| match err {
                WellError::MissingField {
                    ref keyword,
                    grid_index: 0,
                    ..
                } if keyword == kw::INTEHEAD => WellError::StepNotFound { report_step },
                other => other,
            })?;
            for well in wells {
                self.merge_well(&mut merged, well);
            }
        }

        debug!(
            report_step,
            num_grids,
            wells = merged.len(),
            "assembled well solution"
        );
        Ok(merged.into_values().collect())
    }

    /// [`solution`](Self::solution) over every grid present at `report_step`.
    pub fn solution_all_grids(&self, report_step: i32) -> WellResult<Vec<WellData>> {
        let grids = self.grid_count(report_step)?;
        self.solution(report_step, grids.max(1))
    }

    pub fn step_summary(&self, report_step: i32) -> WellResult<StepSummary> {
        let grid_count = self.grid_count(report_step)?;
        let fields = FieldLoader::new(&self.source, report_step);
        let head = fields
            .load_ints(kw::INTEHEAD, 0)
            .map_err(|err| match err {
                WellError::MissingField { .. } => WellError::StepNotFound { report_step },
                other => other,
            })
            .and_then(|items| IntHead::parse(&items))?;
        Ok(StepSummary {
            report_step,
            date: head.date,
            unit_system: head.unit_system,
            grid_count,
            main_grid_wells: head.nwells,
        })
    }

    fn ensure_step(&self, report_step: i32) -> WellResult<()> {
        if self.source.has_report_step(report_step) {
            Ok(())
        } else {
            Err(WellError::StepNotFound { report_step })
        }
    }

    fn merge_well(&self, merged: &mut IndexMap<String, WellData>, well: GridWell) {
        let GridWell {
            name,
            kind,
            completions,
        } = well;
        let entry = merged.entry(name).or_insert_with_key(|name| WellData {
            name: name.clone(),
            is_injector_well: kind.is_injector(),
            completions: Vec::new(),
        });

        // First classification seen wins.
        if entry.is_injector_well != kind.is_injector() {
            warn!(
                well = %entry.name,
                kind = ?kind,
                "well classification differs between grids; keeping first"
            );
        }

        let is_injector = entry.is_injector_well;
        for completion in completions {
            if self.keep_completion(&entry.name, &completion, is_injector) {
                entry.completions.push(completion);
            }
        }
    }

    fn keep_completion(&self, well: &str, completion: &Completion, is_injector: bool) -> bool {
        let rate = completion.reservoir_inflow_rate;
        if rate.abs() < self.options.rate_threshold {
            trace!(well, grid = completion.grid_index, rate, "below rate threshold");
            return false;
        }
        if self.options.disallow_crossflow {
            let consistent = if is_injector { rate < 0.0 } else { rate > 0.0 };
            if !consistent {
                trace!(well, grid = completion.grid_index, rate, "crossflow completion");
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::GridWellsSpec;
    use crate::types::{InjectorPhase, WellKind};
    use rf_core::Ijk;
    use rf_restart::{MemoryRestart, RestartBlock};

    const DIMS: [usize; 3] = [10, 10, 4];
    const WATER: WellKind = WellKind::Injector(InjectorPhase::Water);

    fn block(step: i32, grids: &[GridWellsSpec]) -> RestartBlock {
        let mut block = RestartBlock::new(step);
        for (n, grid) in grids.iter().enumerate() {
            if n == 0 {
                grid.append_to(&mut block).unwrap();
            } else {
                grid.append_lgr_to(&format!("LGR{n}"), &mut block).unwrap();
            }
        }
        block
    }

    fn solver(grids: &[GridWellsSpec], options: SolutionOptions) -> WellSolution<MemoryRestart> {
        let restart = MemoryRestart::from_blocks(vec![block(0, grids)]);
        WellSolution::new(restart, options).unwrap()
    }

    fn rates(well: &WellData) -> Vec<f64> {
        well.completions
            .iter()
            .map(|c| c.reservoir_inflow_rate)
            .collect()
    }

    #[test]
    fn threshold_drops_negligible_completions() {
        let grid = GridWellsSpec::new(DIMS).producer(
            "P1",
            &[([0, 0, 0], 5.0), ([0, 0, 1], -1e-15), ([0, 0, 2], 3.0)],
        );
        let wells = solver(&[grid], SolutionOptions::default())
            .solution(0, 1)
            .unwrap();

        assert_eq!(wells.len(), 1);
        assert_eq!(wells[0].name, "P1");
        assert!(!wells[0].is_injector_well);
        assert_eq!(rates(&wells[0]), vec![5.0, 3.0]);
    }

    #[test]
    fn rate_exactly_at_threshold_is_kept() {
        let grid = GridWellsSpec::new(DIMS).producer("P1", &[([0, 0, 0], 1e-3), ([1, 0, 0], 9e-4)]);
        let wells = solver(&[grid], SolutionOptions::new(1e-3, true))
            .solution(0, 1)
            .unwrap();
        assert_eq!(rates(&wells[0]), vec![1e-3]);
    }

    #[test]
    fn crossflow_completion_dropped_by_default() {
        let grid = GridWellsSpec::new(DIMS).well("I1", WATER, &[([3, 3, 3], 2.0)]);
        let wells = solver(&[grid], SolutionOptions::default())
            .solution(0, 1)
            .unwrap();

        assert_eq!(wells.len(), 1);
        assert!(wells[0].is_injector_well);
        assert!(wells[0].completions.is_empty());
    }

    #[test]
    fn crossflow_kept_when_allowed() {
        let grid = GridWellsSpec::new(DIMS)
            .well("I1", WATER, &[([3, 3, 3], 2.0), ([3, 3, 2], -4.0)])
            .producer("P1", &[([1, 1, 1], -0.5)]);
        let wells = solver(&[grid], SolutionOptions::new(1e-14, false))
            .solution(0, 1)
            .unwrap();

        assert_eq!(rates(&wells[0]), vec![2.0, -4.0]);
        assert_eq!(rates(&wells[1]), vec![-0.5]);
    }

    #[test]
    fn grids_merge_by_name_in_grid_order() {
        let main = GridWellsSpec::new(DIMS)
            .producer("P1", &[([0, 0, 0], 1.0)])
            .producer("P2", &[([5, 5, 0], 2.0)]);
        let lgr = GridWellsSpec::new([3, 3, 3])
            .producer("P1", &[([1, 1, 1], 0.25), ([1, 1, 2], 0.5)])
            .producer("P3", &[([0, 0, 0], 7.0)]);
        let wells = solver(&[main, lgr], SolutionOptions::default())
            .solution(0, 2)
            .unwrap();

        let names: Vec<&str> = wells.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, ["P1", "P2", "P3"]);

        let p1 = &wells[0];
        let grids: Vec<usize> = p1.completions.iter().map(|c| c.grid_index).collect();
        assert_eq!(grids, vec![0, 1, 1]);
        assert_eq!(rates(p1), vec![1.0, 0.25, 0.5]);
        assert_eq!(p1.completions[1].ijk, Ijk::new(1, 1, 1));
    }

    #[test]
    fn first_classification_wins_across_grids() {
        let main = GridWellsSpec::new(DIMS).producer("W", &[([0, 0, 0], 1.0)]);
        let lgr = GridWellsSpec::new([2, 2, 2]).well("W", WATER, &[([0, 0, 0], -3.0), ([1, 0, 0], 2.0)]);
        let wells = solver(&[main, lgr], SolutionOptions::default())
            .solution(0, 2)
            .unwrap();

        assert!(!wells[0].is_injector_well);
        // Completions are judged against the producer classification.
        assert_eq!(rates(&wells[0]), vec![1.0, 2.0]);
    }

    #[test]
    fn fewer_grids_requested_ignores_local_grids() {
        let main = GridWellsSpec::new(DIMS).producer("P1", &[([0, 0, 0], 1.0)]);
        let lgr = GridWellsSpec::new([2, 2, 2]).producer("P9", &[([0, 0, 0], 1.0)]);
        let wells = solver(&[main, lgr], SolutionOptions::default())
            .solution(0, 1)
            .unwrap();
        assert_eq!(wells.len(), 1);
    }

    #[test]
    fn header_only_main_grid_keeps_local_grid_wells() {
        let main = GridWellsSpec::new(DIMS).header_only();
        let lgr1 = GridWellsSpec::new([3, 3, 3]).producer("A", &[([0, 0, 0], 4.0)]);
        let lgr2 = GridWellsSpec::new([3, 3, 3]).producer("B", &[([1, 1, 1], 9.0)]);
        let solution = solver(&[main, lgr1, lgr2], SolutionOptions::default());

        assert_eq!(solution.grid_count(0).unwrap(), 3);
        let wells = solution.solution(0, 3).unwrap();
        let names: Vec<&str> = wells.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
        assert_eq!(wells[0].completions[0].grid_index, 1);
        assert_eq!(rates(&wells[0]), vec![4.0]);
        assert_eq!(wells[1].completions[0].grid_index, 2);
        assert_eq!(wells[1].completions[0].ijk, Ijk::new(1, 1, 1));

        let first_two = solution.solution(0, 2).unwrap();
        assert_eq!(first_two.len(), 1);
        assert_eq!(first_two[0].name, "A");
    }

    #[test]
    fn local_grid_without_wells_between_grids_with_wells() {
        let main = GridWellsSpec::new(DIMS).producer("P1", &[([0, 0, 0], 1.0)]);
        let lgr1 = GridWellsSpec::new([2, 2, 2]).producer("P1", &[([1, 0, 0], 2.0)]);
        let lgr2 = GridWellsSpec::new([2, 2, 2]).header_only();
        let lgr3 = GridWellsSpec::new([2, 2, 2]).producer("P3", &[([0, 1, 1], 3.0)]);
        let wells = solver(&[main, lgr1, lgr2, lgr3], SolutionOptions::default())
            .solution_all_grids(0)
            .unwrap();

        let names: Vec<&str> = wells.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, ["P1", "P3"]);
        let grids: Vec<usize> = wells[0].completions.iter().map(|c| c.grid_index).collect();
        assert_eq!(grids, vec![0, 1]);
        assert_eq!(wells[1].completions[0].grid_index, 3);
        assert_eq!(rates(&wells[1]), vec![3.0]);
    }

    #[test]
    fn zero_grids_rejected() {
        let main = GridWellsSpec::new(DIMS);
        let err = solver(&[main], SolutionOptions::default())
            .solution(0, 0)
            .unwrap_err();
        assert!(matches!(err, WellError::InvalidArg { .. }));
    }

    #[test]
    fn unknown_step_is_step_not_found() {
        let main = GridWellsSpec::new(DIMS).producer("P1", &[([0, 0, 0], 1.0)]);
        let err = solver(&[main], SolutionOptions::default())
            .solution(5, 1)
            .unwrap_err();
        assert!(matches!(err, WellError::StepNotFound { report_step: 5 }));
    }

    #[test]
    fn step_without_header_is_step_not_found() {
        let restart = MemoryRestart::from_blocks(vec![RestartBlock::new(3)]);
        let solution = WellSolution::new(restart, SolutionOptions::default()).unwrap();
        let err = solution.solution(3, 1).unwrap_err();
        assert!(matches!(err, WellError::StepNotFound { report_step: 3 }));
    }

    #[test]
    fn requesting_missing_local_grid_is_missing_field() {
        let main = GridWellsSpec::new(DIMS).producer("P1", &[([0, 0, 0], 1.0)]);
        let err = solver(&[main], SolutionOptions::default())
            .solution(0, 2)
            .unwrap_err();
        assert!(matches!(
            err,
            WellError::MissingField { grid_index: 1, ref keyword, .. } if keyword == "INTEHEAD"
        ));
    }

    #[test]
    fn all_grids_uses_detected_count() {
        let main = GridWellsSpec::new(DIMS).producer("P1", &[([0, 0, 0], 1.0)]);
        let lgr = GridWellsSpec::new([2, 2, 2]).producer("P9", &[([0, 0, 0], 1.0)]);
        let solution = solver(&[main, lgr], SolutionOptions::default());

        assert_eq!(solution.grid_count(0).unwrap(), 2);
        assert_eq!(solution.solution_all_grids(0).unwrap().len(), 2);
    }

    #[test]
    fn summary_reports_header_fields() {
        let date = NaiveDate::from_ymd_opt(2021, 6, 30).unwrap();
        let main = GridWellsSpec::new(DIMS)
            .producer("P1", &[])
            .absent("P2")
            .with_date(date);
        let summary = solver(&[main], SolutionOptions::default())
            .step_summary(0)
            .unwrap();

        assert_eq!(summary.date, Some(date));
        assert_eq!(summary.unit_system, UnitSystem::Metric);
        assert_eq!(summary.grid_count, 1);
        assert_eq!(summary.main_grid_wells, 2);
    }

    #[test]
    fn invalid_options_rejected_at_construction() {
        let restart = MemoryRestart::new();
        let err = WellSolution::new(restart, SolutionOptions::new(-1.0, true)).unwrap_err();
        assert!(matches!(err, WellError::InvalidArg { .. }));
    }
}
