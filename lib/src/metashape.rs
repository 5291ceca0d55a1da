//! Engine implementation driving the headless Metashape runner.
//!
//! The vendor exposes its pipeline through a Python API and ships a
//! headless runner (`metashape -platform offscreen -r <script>`), so
//! this binding works the way a human operator would: it generates a
//! short script and hands it to the runner as an external process.
//!
//! Reconstruction steps are recorded as they are called on the chunk
//! and replayed in a single runner launch when the project is saved.
//! The generated script saves the project file before the first
//! pipeline step, so the file exists on disk even when a later step
//! fails. Mesh measurements each launch a small query script that
//! prints a `key=value` line; hole closing is replayed inside the
//! volume query and never persisted, so the stored project keeps its
//! unmodified mesh.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;
use tempfile::NamedTempFile;

use crate::sdk::{Chunk, Engine, EngineError, Model, Project};

/// Runner program used when none is configured.
pub const DEFAULT_PROGRAM: &str = "metashape";

/// Engine driving the headless Metashape runner as a subprocess.
#[derive(Clone, Debug)]
pub struct MetashapeEngine {
    program: PathBuf,
}

impl MetashapeEngine {
    /// Engine using the given runner program (a name on `PATH` or a
    /// full path).
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for MetashapeEngine {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl Engine for MetashapeEngine {
    type Project = MetashapeProject;

    fn create_project(&self, path: &Path) -> Result<Self::Project, EngineError> {
        Ok(MetashapeProject {
            program: self.program.clone(),
            path: path.to_path_buf(),
            mode: Mode::Create,
            chunk: None,
        })
    }

    fn open_project(&self, path: &Path) -> Result<Self::Project, EngineError> {
        if !path.is_file() {
            return Err(EngineError::Op {
                op: "open_project",
                detail: format!("no project file at {}", path.display()),
            });
        }
        Ok(MetashapeProject {
            program: self.program.clone(),
            path: path.to_path_buf(),
            mode: Mode::Open,
            chunk: None,
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Mode {
    Create,
    Open,
}

/// A project container backed by a `.psx` file on disk.
#[derive(Debug)]
pub struct MetashapeProject {
    program: PathBuf,
    path: PathBuf,
    mode: Mode,
    chunk: Option<MetashapeChunk>,
}

impl Project for MetashapeProject {
    type Chunk = MetashapeChunk;

    fn add_chunk(&mut self) -> Result<&mut Self::Chunk, EngineError> {
        if self.mode == Mode::Open {
            return Err(EngineError::Op {
                op: "add_chunk",
                detail: "cannot add a chunk to an opened project".to_owned(),
            });
        }
        if self.chunk.is_some() {
            return Err(EngineError::Op {
                op: "add_chunk",
                detail: "this binding records one chunk per project".to_owned(),
            });
        }
        Ok(self
            .chunk
            .insert(MetashapeChunk::new(&self.program, &self.path)))
    }

    fn first_chunk(&mut self) -> Result<&mut Self::Chunk, EngineError> {
        if self.mode == Mode::Create && self.chunk.is_none() {
            return Err(EngineError::Op {
                op: "first_chunk",
                detail: "project has no chunks".to_owned(),
            });
        }
        // Opened projects get a lazy handle; a missing chunk or model
        // surfaces when the first query script runs.
        Ok(self
            .chunk
            .get_or_insert_with(|| MetashapeChunk::new(&self.program, &self.path)))
    }

    fn save(&mut self) -> Result<(), EngineError> {
        if self.mode == Mode::Open {
            return Err(EngineError::Op {
                op: "save",
                detail: "opened projects are read-only in this binding".to_owned(),
            });
        }
        let steps = self.chunk.as_ref().map(|chunk| chunk.steps.as_slice());
        let source = render_pipeline(&self.path, steps.unwrap_or_default());
        debug!("running reconstruction script for {}", self.path.display());
        run_script(&self.program, &source, "reconstruction")?;
        Ok(())
    }
}

/// A reconstruction unit recording pipeline steps for replay.
#[derive(Debug)]
pub struct MetashapeChunk {
    steps: Vec<Step>,
    model: MetashapeModel,
}

impl MetashapeChunk {
    fn new(program: &Path, path: &Path) -> Self {
        Self {
            steps: Vec::new(),
            model: MetashapeModel {
                program: program.to_path_buf(),
                path: path.to_path_buf(),
                close_level: None,
            },
        }
    }
}

impl Chunk for MetashapeChunk {
    type Model = MetashapeModel;

    fn add_photos(&mut self, photos: &[PathBuf]) -> Result<(), EngineError> {
        self.steps.push(Step::AddPhotos(photos.to_vec()));
        Ok(())
    }

    fn match_photos(&mut self, downscale: u32) -> Result<(), EngineError> {
        self.steps.push(Step::MatchPhotos(downscale));
        Ok(())
    }

    fn align_cameras(&mut self) -> Result<(), EngineError> {
        self.steps.push(Step::AlignCameras);
        Ok(())
    }

    fn optimize_cameras(&mut self) -> Result<(), EngineError> {
        self.steps.push(Step::OptimizeCameras);
        Ok(())
    }

    fn build_depth_maps(&mut self, downscale: u32) -> Result<(), EngineError> {
        self.steps.push(Step::BuildDepthMaps(downscale));
        Ok(())
    }

    fn build_model(&mut self) -> Result<(), EngineError> {
        self.steps.push(Step::BuildModel);
        Ok(())
    }

    fn build_uv(&mut self, texture_size: u32) -> Result<(), EngineError> {
        self.steps.push(Step::BuildUv(texture_size));
        Ok(())
    }

    fn build_texture(&mut self, texture_size: u32) -> Result<(), EngineError> {
        self.steps.push(Step::BuildTexture(texture_size));
        Ok(())
    }

    fn model(&mut self) -> Result<&mut Self::Model, EngineError> {
        Ok(&mut self.model)
    }
}

/// Mesh handle answering measurement queries via the runner.
#[derive(Debug)]
pub struct MetashapeModel {
    program: PathBuf,
    path: PathBuf,
    close_level: Option<u32>,
}

impl MetashapeModel {
    fn query(&self, op: &'static str, expr: &str) -> Result<f64, EngineError> {
        let source = render_query(&self.path, self.close_level, op, expr);
        debug!("querying {op} for {}", self.path.display());
        let stdout = run_script(&self.program, &source, op)?;
        parse_measure(op, &stdout)
    }
}

impl Model for MetashapeModel {
    fn surface_area(&mut self) -> Result<f64, EngineError> {
        self.query("surface_area", "area()")
    }

    fn close_holes(&mut self, level: u32) -> Result<(), EngineError> {
        self.close_level = Some(level);
        Ok(())
    }

    fn volume(&mut self) -> Result<f64, EngineError> {
        self.query("volume", "volume()")
    }
}

/// One recorded pipeline step, in vendor API terms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    AddPhotos(Vec<PathBuf>),
    MatchPhotos(u32),
    AlignCameras,
    OptimizeCameras,
    BuildDepthMaps(u32),
    BuildModel,
    BuildUv(u32),
    BuildTexture(u32),
}

impl Step {
    fn render(&self) -> String {
        match self {
            Self::AddPhotos(photos) => {
                let list = photos
                    .iter()
                    .map(|photo| py_str(photo))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("chunk.addPhotos([{list}])")
            }
            Self::MatchPhotos(downscale) => format!("chunk.matchPhotos(downscale={downscale})"),
            Self::AlignCameras => "chunk.alignCameras()".to_owned(),
            Self::OptimizeCameras => "chunk.optimizeCameras()".to_owned(),
            Self::BuildDepthMaps(downscale) => {
                format!("chunk.buildDepthMaps(downscale={downscale})")
            }
            Self::BuildModel => "chunk.buildModel(source_data=Metashape.DepthMapsData)".to_owned(),
            Self::BuildUv(size) => format!("chunk.buildUV(texture_size={size})"),
            Self::BuildTexture(size) => format!("chunk.buildTexture(texture_size={size})"),
        }
    }
}

/// A path as a quoted Python string literal. Rust's `str` debug
/// escaping is a compatible subset of Python's.
pub(crate) fn py_str(path: &Path) -> String {
    format!("{:?}", path.to_string_lossy())
}

/// The full reconstruction script for one project: create, save,
/// replay every recorded step, save again.
pub(crate) fn render_pipeline(path: &Path, steps: &[Step]) -> String {
    let mut lines = vec![
        "import Metashape".to_owned(),
        "doc = Metashape.Document()".to_owned(),
        format!("doc.save({})", py_str(path)),
        "chunk = doc.addChunk()".to_owned(),
    ];
    for step in steps {
        lines.push(step.render());
    }
    lines.push("doc.save()".to_owned());
    lines.join("\n")
}

/// A measurement script: open the project, optionally close holes,
/// print one `key=value` line for the driver to parse.
pub(crate) fn render_query(
    path: &Path,
    close_level: Option<u32>,
    op: &str,
    expr: &str,
) -> String {
    let mut lines = vec![
        "import Metashape".to_owned(),
        "doc = Metashape.Document()".to_owned(),
        format!("doc.open({})", py_str(path)),
        "model = doc.chunks[0].model".to_owned(),
    ];
    if let Some(level) = close_level {
        lines.push(format!("model.closeHoles(level={level})"));
    }
    lines.push(format!("print(\"{op}=%r\" % model.{expr})"));
    lines.join("\n")
}

/// Extract the `op=<float>` line from runner stdout.
pub(crate) fn parse_measure(op: &'static str, stdout: &str) -> Result<f64, EngineError> {
    let prefix = format!("{op}=");
    stdout
        .lines()
        .filter_map(|line| line.strip_prefix(prefix.as_str()))
        .next_back()
        .and_then(|value| value.trim().parse::<f64>().ok())
        .ok_or_else(|| EngineError::Op {
            op,
            detail: "no measurement found in engine output".to_owned(),
        })
}

fn run_script(program: &Path, source: &str, op: &'static str) -> Result<String, EngineError> {
    let mut script = NamedTempFile::new().map_err(EngineError::Script)?;
    script
        .write_all(source.as_bytes())
        .and_then(|()| script.flush())
        .map_err(EngineError::Script)?;

    let output = Command::new(program)
        .arg("-platform")
        .arg("offscreen")
        .arg("-r")
        .arg(script.path())
        .output()
        .map_err(|source| EngineError::Spawn {
            program: program.display().to_string(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = stderr.trim();
        return Err(EngineError::Op {
            op,
            detail: if detail.is_empty() {
                format!("runner exited with {}", output.status)
            } else {
                detail.to_owned()
            },
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
