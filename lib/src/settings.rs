//! Pipeline constants and their overridable settings structs.
//!
//! The numeric literals the vendor pipeline is usually run with live
//! here as named defaults rather than inline magic numbers; both CLIs
//! expose them as flags.

/// File extension of a persisted project container.
pub const PROJECT_EXTENSION: &str = "psx";

/// Default feature-matching downscale: 0, full resolution.
pub const MATCH_DOWNSCALE: u32 = 0;

/// Default depth-map downscale: 1, half resolution.
pub const DEPTH_DOWNSCALE: u32 = 1;

/// Default UV/texture resolution in pixels.
pub const TEXTURE_SIZE: u32 = 16384;

/// Default hole-closing aggressiveness before volume measurement.
pub const HOLE_LEVEL: u32 = 100;

/// Tunables for the reconstruction pipeline.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PipelineSettings {
    /// Feature-matching downscale (0 = full resolution).
    pub match_downscale: u32,
    /// Depth-map downscale (1 = half resolution).
    pub depth_downscale: u32,
    /// Resolution used for both the UV layout and the texture bake.
    pub texture_size: u32,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            match_downscale: MATCH_DOWNSCALE,
            depth_downscale: DEPTH_DOWNSCALE,
            texture_size: TEXTURE_SIZE,
        }
    }
}

/// Tunables for the statistics pass.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StatsSettings {
    /// Hole-closing aggressiveness applied before measuring volume.
    pub hole_level: u32,
}

impl Default for StatsSettings {
    fn default() -> Self {
        Self {
            hole_level: HOLE_LEVEL,
        }
    }
}
