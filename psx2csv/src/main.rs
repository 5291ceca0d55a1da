#![deny(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::complexity)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::perf)]
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
//! Extract surface area and volume statistics from reconstructed
//! coral projects into a CSV.
//!
//! Every immediate subdirectory of `--projects_dir` is expected to
//! hold `<project_name>.psx`. The output file is rewritten from
//! scratch on every run: header first, then one row per project.

use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use log::{error, info};

use reefmodel::metashape::{DEFAULT_PROGRAM, MetashapeEngine};
use reefmodel::settings;
use reefmodel::settings::StatsSettings;
use reefmodel::stats::collect_stats;

#[derive(Parser, Debug)]
#[command(version, about, long_about)]
struct Cli {
    #[arg(long = "projects_dir", help = "directory with one project subdirectory per coral")]
    projects_dir: PathBuf,
    #[arg(long = "project_name", default_value = "reconstruction")]
    project_name: String,
    #[arg(long = "output", default_value = "model_stats.csv", help = "output CSV path")]
    output: PathBuf,
    #[arg(
        long = "hole_level",
        default_value_t = settings::HOLE_LEVEL,
        help = "hole closing aggressiveness applied before measuring volume"
    )]
    hole_level: u32,
    #[arg(long = "metashape", default_value = DEFAULT_PROGRAM, help = "headless runner program")]
    metashape: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Cli::parse();
    let settings = StatsSettings {
        hole_level: args.hole_level,
    };
    let engine = MetashapeEngine::new(args.metashape);

    let summary = collect_stats(
        &engine,
        &args.projects_dir,
        &args.project_name,
        &args.output,
        &settings,
    )?;

    info!(
        "wrote {} row(s) to {}",
        summary.completed.len(),
        args.output.display()
    );
    for failure in &summary.failed {
        error!("project {}: {}", failure.name, failure.error);
    }
    if !summary.is_clean() {
        bail!(
            "{} of {} project(s) failed",
            summary.failed.len(),
            summary.total()
        );
    }

    Ok(())
}
