//! rf-wells: per-well completion flow rates from restart files.
//!
//! [`WellSolution`] reads the well section (`INTEHEAD`, `ZWEL`, `IWEL`,
//! `ICON`, `XCON`) of the main grid and any local grids at one report
//! step and merges them into one [`WellData`] per well name.
//!
//! ```no_run
//! use rf_wells::{SolutionOptions, WellSolution};
//!
//! let wells = WellSolution::open("CASE.UNRST", SolutionOptions::default())?;
//! for well in wells.solution(10, 1)? {
//!     println!("{}: {} completions", well.name, well.completions.len());
//! }
//! # Ok::<(), rf_wells::WellError>(())
//! ```

pub mod error;
pub mod fields;
pub mod layout;
pub mod options;
pub mod solution;
pub mod synth;
pub mod table;
pub mod types;

pub use error::{WellError, WellResult};
pub use fields::FieldLoader;
pub use layout::{IntHead, UnitSystem};
pub use options::{DEFAULT_RATE_THRESHOLD, SolutionOptions};
pub use solution::{StepSummary, WellSolution};
pub use synth::GridWellsSpec;
pub use table::read_grid_wells;
pub use types::{Completion, GridWell, InjectorPhase, WellData, WellKind};
