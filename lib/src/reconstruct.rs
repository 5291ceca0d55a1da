//! The reconstruction driver: photo sets in, project files out.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::Error;
use crate::batch::{BatchSummary, dir_name, subdirectories};
use crate::images::collect_jpegs;
use crate::sdk::{Chunk, Engine, Project};
use crate::settings::{PROJECT_EXTENSION, PipelineSettings};

/// Path of the project file generated for `site_name`:
/// `<projects_dir>/<site_name>/<project_name>.psx`.
#[must_use]
pub fn project_path(projects_dir: &Path, site_name: &str, project_name: &str) -> PathBuf {
    projects_dir
        .join(site_name)
        .join(format!("{project_name}.{PROJECT_EXTENSION}"))
}

/// Run the full fixed-order pipeline for one photo set, producing a
/// project file at `project_file`.
///
/// The project is persisted as soon as it is created, so a file exists
/// even when a later step fails. An empty photo set is passed through
/// to the engine unchanged.
///
/// # Errors
/// When the project directory cannot be created or any engine step
/// fails.
pub fn reconstruct_project<E: Engine>(
    engine: &E,
    project_file: &Path,
    photos: &[PathBuf],
    settings: &PipelineSettings,
) -> Result<(), Error> {
    if let Some(parent) = project_file.parent() {
        fs::create_dir_all(parent).map_err(|source| Error::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut project = engine.create_project(project_file)?;
    let chunk = project.add_chunk()?;
    chunk.add_photos(photos)?;
    chunk.match_photos(settings.match_downscale)?;
    chunk.align_cameras()?;
    chunk.optimize_cameras()?;
    chunk.build_depth_maps(settings.depth_downscale)?;
    chunk.build_model()?;
    chunk.build_uv(settings.texture_size)?;
    chunk.build_texture(settings.texture_size)?;
    project.save()?;

    Ok(())
}

/// Reconstruct every site under `site_dir`, one project per immediate
/// subdirectory, sequentially and in sorted name order.
///
/// A failing site is recorded in the returned summary and the batch
/// continues with the next one.
///
/// # Errors
/// When `site_dir` itself cannot be read. Per-site failures do not
/// abort the run.
pub fn reconstruct_sites<E: Engine>(
    engine: &E,
    site_dir: &Path,
    projects_dir: &Path,
    project_name: &str,
    settings: &PipelineSettings,
) -> Result<BatchSummary, Error> {
    let mut summary = BatchSummary::default();

    for site in subdirectories(site_dir)? {
        let name = dir_name(&site);
        info!("reconstructing site {name}");
        let outcome = collect_jpegs(&site).and_then(|photos| {
            info!("{name}: {} photo(s)", photos.len());
            let project_file = project_path(projects_dir, &name, project_name);
            reconstruct_project(engine, &project_file, &photos, settings)
        });
        summary.record(name, outcome);
    }

    Ok(summary)
}
