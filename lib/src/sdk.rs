//! Capability traits for the external photogrammetry engine.
//!
//! The engine (Agisoft Metashape or compatible) owns every substantive
//! algorithm: feature matching, camera alignment, depth-map fusion,
//! meshing, texturing, hole closing and area/volume integration. The
//! drivers in this crate only sequence those capabilities, so the seam
//! is deliberately narrow and everything behind it is opaque. Tests
//! substitute a fake implementation.

use std::io;
use std::path::{Path, PathBuf};

/// Error raised by an engine implementation.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine runner could not be launched at all.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// The runner program that was invoked.
        program: String,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// A pipeline script could not be staged on disk.
    #[error("could not stage engine script: {0}")]
    Script(#[source] io::Error),

    /// The engine rejected or failed an operation.
    #[error("{op} failed: {detail}")]
    Op {
        /// The operation that failed.
        op: &'static str,
        /// Whatever detail the engine surfaced.
        detail: String,
    },
}

/// Project container lifecycle: create, open, and that is all.
pub trait Engine {
    /// The project container type this engine produces.
    type Project: Project;

    /// Create a new project at `path` and persist it immediately, so a
    /// project file exists even if a later pipeline step fails.
    ///
    /// # Errors
    /// When the engine cannot create or persist the container.
    fn create_project(&self, path: &Path) -> Result<Self::Project, EngineError>;

    /// Open an existing project at `path`.
    ///
    /// # Errors
    /// When the project file is missing or unreadable.
    fn open_project(&self, path: &Path) -> Result<Self::Project, EngineError>;
}

/// A persisted project container holding reconstruction units.
pub trait Project {
    /// The reconstruction unit type within this container.
    type Chunk: Chunk;

    /// Append a fresh reconstruction unit to the container.
    ///
    /// # Errors
    /// When the container cannot accept another unit.
    fn add_chunk(&mut self) -> Result<&mut Self::Chunk, EngineError>;

    /// Access the first reconstruction unit.
    ///
    /// # Errors
    /// When the container holds no units.
    fn first_chunk(&mut self) -> Result<&mut Self::Chunk, EngineError>;

    /// Persist the container and everything built inside it.
    ///
    /// # Errors
    /// When the engine fails to write the container, or when any
    /// recorded pipeline step fails during replay.
    fn save(&mut self) -> Result<(), EngineError>;
}

/// A reconstruction unit: photos in, textured mesh out.
///
/// Operations mirror the vendor pipeline and are expected to be called
/// in the documented order; implementations may defer execution until
/// [`Project::save`].
pub trait Chunk {
    /// The mesh model type this unit produces.
    type Model: Model;

    /// Register the photo set for this unit.
    ///
    /// # Errors
    /// When the engine rejects the photo list.
    fn add_photos(&mut self, photos: &[PathBuf]) -> Result<(), EngineError>;

    /// Run feature matching. `downscale` 0 means full resolution.
    ///
    /// # Errors
    /// When matching fails (for example, insufficient overlap).
    fn match_photos(&mut self, downscale: u32) -> Result<(), EngineError>;

    /// Estimate camera poses from the matched features.
    ///
    /// # Errors
    /// When alignment fails.
    fn align_cameras(&mut self) -> Result<(), EngineError>;

    /// Refine camera intrinsics and extrinsics.
    ///
    /// # Errors
    /// When optimization fails.
    fn optimize_cameras(&mut self) -> Result<(), EngineError>;

    /// Build dense depth maps. `downscale` 1 means half resolution.
    ///
    /// # Errors
    /// When depth-map generation fails.
    fn build_depth_maps(&mut self, downscale: u32) -> Result<(), EngineError>;

    /// Fuse the depth maps into a surface mesh.
    ///
    /// # Errors
    /// When meshing fails.
    fn build_model(&mut self) -> Result<(), EngineError>;

    /// Lay out UV coordinates at the given texture resolution.
    ///
    /// # Errors
    /// When the UV build fails.
    fn build_uv(&mut self, texture_size: u32) -> Result<(), EngineError>;

    /// Bake the texture at the given resolution.
    ///
    /// # Errors
    /// When the texture bake fails.
    fn build_texture(&mut self, texture_size: u32) -> Result<(), EngineError>;

    /// Access the reconstructed mesh model.
    ///
    /// # Errors
    /// When the unit has no model.
    fn model(&mut self) -> Result<&mut Self::Model, EngineError>;
}

/// Mesh-level measurements and repair.
pub trait Model {
    /// Total surface area of the mesh.
    ///
    /// # Errors
    /// When the engine cannot produce the measurement.
    fn surface_area(&mut self) -> Result<f64, EngineError>;

    /// Close small holes up to the given aggressiveness level. The
    /// mutation is in-memory only; it is never persisted back.
    ///
    /// # Errors
    /// When hole closing fails.
    fn close_holes(&mut self, level: u32) -> Result<(), EngineError>;

    /// Enclosed volume of the mesh. Call after [`Model::close_holes`];
    /// an open mesh has no well-defined volume.
    ///
    /// # Errors
    /// When the engine cannot produce the measurement.
    fn volume(&mut self) -> Result<f64, EngineError>;
}
