#![deny(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::complexity)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::perf)]
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
//! Reconstruct textured coral models from per-site JPEG photo sets.
//!
//! Each immediate subdirectory of `--site_dir` is one site; its photos
//! are collected recursively and pushed through the full engine
//! pipeline, producing `<projects_dir>/<site>/<project_name>.psx`.

use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use log::{error, info};

use reefmodel::metashape::{DEFAULT_PROGRAM, MetashapeEngine};
use reefmodel::reconstruct::reconstruct_sites;
use reefmodel::settings;
use reefmodel::settings::PipelineSettings;

#[derive(Parser, Debug)]
#[command(version, about, long_about)]
struct Cli {
    #[arg(long = "site_dir", help = "directory with one subdirectory of JPEG photos per site")]
    site_dir: PathBuf,
    #[arg(long = "projects_dir", help = "directory receiving one project subdirectory per site")]
    projects_dir: PathBuf,
    #[arg(long = "project_name", default_value = "reconstruction")]
    project_name: String,
    #[arg(
        long = "match_downscale",
        default_value_t = settings::MATCH_DOWNSCALE,
        help = "feature matching downscale (0 = full resolution)"
    )]
    match_downscale: u32,
    #[arg(
        long = "depth_downscale",
        default_value_t = settings::DEPTH_DOWNSCALE,
        help = "depth map downscale (1 = half resolution)"
    )]
    depth_downscale: u32,
    #[arg(
        long = "texture_size",
        default_value_t = settings::TEXTURE_SIZE,
        help = "UV and texture resolution in pixels"
    )]
    texture_size: u32,
    #[arg(long = "metashape", default_value = DEFAULT_PROGRAM, help = "headless runner program")]
    metashape: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Cli::parse();
    let settings = PipelineSettings {
        match_downscale: args.match_downscale,
        depth_downscale: args.depth_downscale,
        texture_size: args.texture_size,
    };
    let engine = MetashapeEngine::new(args.metashape);

    let summary = reconstruct_sites(
        &engine,
        &args.site_dir,
        &args.projects_dir,
        &args.project_name,
        &settings,
    )?;

    info!("reconstructed {} site(s)", summary.completed.len());
    for failure in &summary.failed {
        error!("site {}: {}", failure.name, failure.error);
    }
    if !summary.is_clean() {
        bail!(
            "{} of {} site(s) failed",
            summary.failed.len(),
            summary.total()
        );
    }

    Ok(())
}
