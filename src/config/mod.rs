//! Run configuration and serialization.
//!
//! A [`RunConfig`] describes one visibility computation: the voxel grid, the
//! camera candidates and the engine settings. It is loaded from `.json` with
//! serde_json or from XML with quick-xml, and turned into validated
//! components by the providers in [`crate::registry`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::camera::{CameraParams, Direction, ResolutionRange};
use crate::environment::VoxelEnvironment;
use crate::error::ConfigError;
use crate::visibility::{EngineConfig, DEFAULT_SAMPLE_STEP};

/// Name of the built-in provider of every component.
pub const BASE_PROVIDER: &str = "base";

fn default_provider() -> String {
    BASE_PROVIDER.to_string()
}

fn default_sample_step() -> f64 {
    DEFAULT_SAMPLE_STEP
}

/// Complete description of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "CoverageRun")]
pub struct RunConfig {
    pub environment: EnvironmentConfig,
    pub cameras: CameraConfig,
    #[serde(default)]
    pub visibility: VisibilityConfig,
}

/// Voxel grid description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Provider name.
    #[serde(rename = "type", default = "default_provider")]
    pub provider: String,
    /// `[width, height, depth]` in voxels.
    pub shape: Vec<usize>,
    /// One flag per voxel, nonzero = occupied.
    pub occupancy: Vec<u8>,
    /// Voxel side length in meters.
    pub voxel_len: f64,
    /// One flag per voxel, nonzero = target. Empty means every voxel.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<u8>,
}

impl EnvironmentConfig {
    pub fn build(&self) -> Result<VoxelEnvironment, ConfigError> {
        VoxelEnvironment::from_dims(
            &self.shape,
            &self.occupancy,
            self.voxel_len,
            (!self.targets.is_empty()).then_some(self.targets.as_slice()),
        )
    }
}

/// `[width, height]` pair of a sensor clip or an image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

impl Extent {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn to_array(self) -> [f64; 2] {
        [self.width, self.height]
    }
}

impl From<[f64; 2]> for Extent {
    fn from([width, height]: [f64; 2]) -> Self {
        Self { width, height }
    }
}

/// Index-aligned camera parameter arrays, one entry per voxel.
///
/// Pairs are stored with named fields (`pan`/`tilt`, `width`/`height`,
/// `min`/`max`) so they keep their shape in XML, where nested sequences
/// would be flattened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Provider name.
    #[serde(rename = "type", default = "default_provider")]
    pub provider: String,
    /// Viewing direction per camera, radians.
    pub directions: Vec<Direction>,
    /// Sensor clip per camera, meters.
    pub clip_shapes: Vec<Extent>,
    /// Focal length per camera, meters.
    pub focal_lens: Vec<f64>,
    /// Image size in pixels per camera.
    pub resolutions: Vec<Extent>,
    /// Horizontal pixel density requirement per camera.
    pub horizontal_resols: Vec<ResolutionRange>,
    /// Vertical pixel density requirement per camera.
    pub vertical_resols: Vec<ResolutionRange>,
    /// Deployment cost per camera. Empty means a unit cost each.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub costs: Vec<f64>,
}

impl CameraConfig {
    /// The same camera description repeated `count` times.
    pub fn uniform(count: usize, params: &CameraParams) -> Self {
        Self {
            provider: default_provider(),
            directions: vec![params.direction; count],
            clip_shapes: vec![params.clip_shape.into(); count],
            focal_lens: vec![params.focal_len; count],
            resolutions: vec![params.resolution.into(); count],
            horizontal_resols: vec![params.horizontal_resol; count],
            vertical_resols: vec![params.vertical_resol; count],
            costs: vec![params.cost; count],
        }
    }

    /// Number of cameras described, taken from the direction array.
    pub fn len(&self) -> usize {
        self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    /// Check that every array matches `directions` in length and produce
    /// per-camera parameters.
    pub fn to_params(&self) -> Result<Vec<CameraParams>, ConfigError> {
        let expected = self.len();
        let costs = if self.costs.is_empty() { expected } else { self.costs.len() };
        let lengths = [
            ("clip_shapes", self.clip_shapes.len()),
            ("focal_lens", self.focal_lens.len()),
            ("resolutions", self.resolutions.len()),
            ("horizontal_resols", self.horizontal_resols.len()),
            ("vertical_resols", self.vertical_resols.len()),
            ("costs", costs),
        ];
        for (field, actual) in lengths {
            if actual != expected {
                return Err(ConfigError::CameraArrayMismatch {
                    field,
                    expected,
                    actual,
                });
            }
        }

        Ok((0..expected)
            .map(|i| CameraParams {
                direction: self.directions[i],
                clip_shape: self.clip_shapes[i].to_array(),
                focal_len: self.focal_lens[i],
                resolution: self.resolutions[i].to_array(),
                horizontal_resol: self.horizontal_resols[i],
                vertical_resol: self.vertical_resols[i],
                cost: self.costs.get(i).copied().unwrap_or(1.0),
            })
            .collect())
    }
}

/// Visibility engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilityConfig {
    /// Provider name.
    #[serde(rename = "type", default = "default_provider")]
    pub provider: String,
    /// Ray-march step in voxels.
    #[serde(default = "default_sample_step")]
    pub sample_step: f64,
    /// Worker threads, 0 = one per available core.
    #[serde(default)]
    pub workers: usize,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            sample_step: DEFAULT_SAMPLE_STEP,
            workers: 0,
        }
    }
}

impl VisibilityConfig {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            sample_step: self.sample_step,
            workers: self.workers,
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().map(|e| e == "json").unwrap_or(false)
}

/// Load a run configuration; `.json` files are read as JSON, anything else
/// as XML.
pub fn load_run_config(path: &Path) -> Result<RunConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;

    let config = if is_json(path) {
        serde_json::from_str(&contents)?
    } else {
        quick_xml::de::from_str(&contents)?
    };
    Ok(config)
}

/// Save a run configuration, choosing the format from the extension.
pub fn save_run_config(config: &RunConfig, path: &Path) -> Result<(), ConfigError> {
    let contents = if is_json(path) {
        serde_json::to_string_pretty(config)?
    } else {
        let xml = quick_xml::se::to_string(config)?;
        format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}", xml)
    };
    fs::write(path, contents)?;
    Ok(())
}
