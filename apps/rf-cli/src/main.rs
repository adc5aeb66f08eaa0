use clap::{Parser, Subcommand};
use rf_restart::{RestartError, RestartFile};
use rf_wells::{SolutionOptions, WellData, WellError, WellSolution};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Parser)]
#[command(name = "rf-cli")]
#[command(about = "Restart file inspection and well flow extraction", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List report steps with date, unit system, grid count and wells
    Steps {
        /// Path to the restart file
        file: PathBuf,
    },
    /// List the keywords of one report step
    Keywords {
        /// Path to the restart file
        file: PathBuf,
        /// Report step
        #[arg(long)]
        step: i32,
    },
    /// Show per-well completion flows at one report step
    Wells {
        /// Path to the restart file
        file: PathBuf,
        /// Report step
        #[arg(long)]
        step: i32,
        /// Number of grids to merge (main grid first); all grids if omitted
        #[arg(long)]
        grids: Option<usize>,
        /// YAML file with solution options
        #[arg(long)]
        config: Option<PathBuf>,
        /// Drop completions with |rate| below this, m³/s
        #[arg(long)]
        rate_threshold: Option<f64>,
        /// Keep completions flowing against the well type
        #[arg(long)]
        allow_crossflow: bool,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Well(#[from] WellError),

    #[error(transparent)]
    Restart(#[from] RestartError),

    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Steps { file } => cmd_steps(&file),
        Commands::Keywords { file, step } => cmd_keywords(&file, step),
        Commands::Wells {
            file,
            step,
            grids,
            config,
            rate_threshold,
            allow_crossflow,
            json,
        } => {
            let options = resolve_options(config.as_deref(), rate_threshold, allow_crossflow)?;
            cmd_wells(&file, step, grids, options, json)
        }
    }
}

/// Config file first, then command-line overrides.
fn resolve_options(
    config: Option<&Path>,
    rate_threshold: Option<f64>,
    allow_crossflow: bool,
) -> CliResult<SolutionOptions> {
    let mut options = match config {
        Some(path) => SolutionOptions::load(path)?,
        None => SolutionOptions::default(),
    };
    if let Some(threshold) = rate_threshold {
        options.rate_threshold = threshold;
    }
    if allow_crossflow {
        options.disallow_crossflow = false;
    }
    options.validate()?;
    Ok(options)
}

fn cmd_steps(file: &Path) -> CliResult<()> {
    let solution = WellSolution::open(file, SolutionOptions::default())?;

    println!(
        "{:>6}  {:<10}  {:<8}  {:>5}  {:>5}",
        "STEP", "DATE", "UNITS", "GRIDS", "WELLS"
    );
    for step in solution.report_steps() {
        match solution.step_summary(step) {
            Ok(summary) => {
                let date = summary
                    .date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:>6}  {:<10}  {:<8}  {:>5}  {:>5}",
                    step,
                    date,
                    summary.unit_system.to_string(),
                    summary.grid_count,
                    summary.main_grid_wells
                );
            }
            Err(err) => {
                warn!(step, error = %err, "no well header");
                println!("{:>6}  {:<10}  {:<8}  {:>5}  {:>5}", step, "-", "-", "-", "-");
            }
        }
    }
    Ok(())
}

fn cmd_keywords(file: &Path, step: i32) -> CliResult<()> {
    let restart = RestartFile::open(file)?;
    let headers = restart
        .keywords(step)
        .ok_or(WellError::StepNotFound { report_step: step })?;

    println!("Report step {} ({} keywords):", step, headers.len());
    for header in headers {
        println!(
            "  {:<8}  {:<4}  {:>10}  grid {:>2}  @{}",
            header.name,
            header.kind.to_string(),
            header.count,
            header.grid_index,
            header.offset
        );
    }
    Ok(())
}

fn cmd_wells(
    file: &Path,
    step: i32,
    grids: Option<usize>,
    options: SolutionOptions,
    json: bool,
) -> CliResult<()> {
    let solution = WellSolution::open(file, options)?;
    let wells = match grids {
        Some(n) => solution.solution(step, n)?,
        None => solution.solution_all_grids(step)?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&wells)?);
    } else {
        print_wells(&wells);
    }
    Ok(())
}

fn print_wells(wells: &[WellData]) {
    if wells.is_empty() {
        println!("No wells at this report step");
        return;
    }
    for well in wells {
        let role = if well.is_injector_well {
            "injector"
        } else {
            "producer"
        };
        println!(
            "{} ({}, {} completions, total {:.6e} m³/s)",
            well.name,
            role,
            well.completions.len(),
            well.total_reservoir_inflow_rate()
        );
        for c in &well.completions {
            println!(
                "  grid {:>2}  {:<16}  {:>14.6e}",
                c.grid_index,
                c.ijk.to_string(),
                c.reservoir_inflow_rate
            );
        }
    }
}
