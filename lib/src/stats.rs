//! The statistics driver: project files in, CSV rows out.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use crate::Error;
use crate::batch::{BatchSummary, dir_name, subdirectories};
use crate::sdk::{Chunk, Engine, Model, Project};
use crate::settings::{PROJECT_EXTENSION, StatsSettings};

/// Header row of the statistics CSV.
pub const CSV_HEADER: &str = "Coral Number,Surface Area,Volume";

/// Surface measurements taken from one reconstructed model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelStats {
    /// Total surface area, in engine units squared.
    pub surface_area: f64,
    /// Enclosed volume after hole closing, in engine units cubed.
    pub volume: f64,
}

/// Measure one project: open it, take the first chunk's model, read
/// the surface area, close small holes, read the volume.
///
/// Area is read before hole closing mutates the mesh and volume after;
/// the mutated mesh is not saved back.
///
/// # Errors
/// When the project is missing or corrupt, has no chunk or model, or
/// a measurement fails.
pub fn project_stats<E: Engine>(
    engine: &E,
    project_file: &Path,
    settings: &StatsSettings,
) -> Result<ModelStats, Error> {
    let mut project = engine.open_project(project_file)?;
    let chunk = project.first_chunk()?;
    let model = chunk.model()?;

    let surface_area = model.surface_area()?;
    model.close_holes(settings.hole_level)?;
    let volume = model.volume()?;

    Ok(ModelStats {
        surface_area,
        volume,
    })
}

/// Measure every project under `projects_dir` and write the CSV at
/// `output`.
///
/// The output file is truncated and given its header before any
/// project is touched, so a rerun overwrites rather than accumulates.
/// One row is appended per successful project, in sorted subdirectory
/// order, reopening the file per row. Area and volume are also printed
/// to stdout per project.
///
/// # Errors
/// When `projects_dir` cannot be read or the output file cannot be
/// written. Per-project engine failures are recorded in the summary
/// and do not abort the run.
pub fn collect_stats<E: Engine>(
    engine: &E,
    projects_dir: &Path,
    project_name: &str,
    output: &Path,
    settings: &StatsSettings,
) -> Result<BatchSummary, Error> {
    write_header(output)?;

    let mut summary = BatchSummary::default();
    for project_dir in subdirectories(projects_dir)? {
        let name = dir_name(&project_dir);
        let project_file = project_dir.join(format!("{project_name}.{PROJECT_EXTENSION}"));
        info!("measuring {name}");
        match project_stats(engine, &project_file, settings) {
            Ok(stats) => {
                println!("Surface Area: {}", stats.surface_area);
                println!("Volume: {}", stats.volume);
                append_record(output, &name, &stats)?;
                summary.record(name, Ok(()));
            }
            Err(error) => summary.record(name, Err(error)),
        }
    }

    Ok(summary)
}

/// Truncate `output` and write the fixed header row.
fn write_header(output: &Path) -> Result<(), Error> {
    let file = File::create(output).map_err(|source| Error::Write {
        path: output.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{CSV_HEADER}").map_err(|source| Error::Write {
        path: output.to_path_buf(),
        source,
    })
}

/// Append one `(name, area, volume)` row. Numbers use default `f64`
/// formatting; none of the three fields can contain a comma.
fn append_record(output: &Path, name: &str, stats: &ModelStats) -> Result<(), Error> {
    let file = OpenOptions::new()
        .append(true)
        .open(output)
        .map_err(|source| Error::Write {
            path: output.to_path_buf(),
            source,
        })?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{},{},{}", name, stats.surface_area, stats.volume).map_err(|source| {
        Error::Write {
            path: output.to_path_buf(),
            source,
        }
    })
}
