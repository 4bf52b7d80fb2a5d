//! Single camera geometry: depth of field and field of view.

use serde::{Deserialize, Serialize};

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::ConfigError;

/// Viewing direction in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Direction {
    /// Horizontal angle, measured in the x/z plane.
    pub pan: f64,
    /// Vertical angle above the x/z plane.
    pub tilt: f64,
}

impl Direction {
    pub fn new(pan: f64, tilt: f64) -> Self {
        Self { pan, tilt }
    }
}

/// Required pixel density range in pixels per meter.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResolutionRange {
    pub min: f64,
    pub max: f64,
}

impl ResolutionRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn is_inverted(&self) -> bool {
        self.min >= self.max
    }
}

/// Depth of field `[near, far]` in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dof {
    pub near: f64,
    pub far: f64,
}

impl Dof {
    /// The degenerate DOF of a camera that cannot resolve anything.
    pub const ZERO: Dof = Dof { near: 0.0, far: 0.0 };

    pub fn new(near: f64, far: f64) -> Self {
        Self { near, far }
    }

    /// Whether a physical distance lies within `[near, far]`.
    pub fn contains(&self, distance: f64) -> bool {
        distance >= self.near && distance <= self.far
    }
}

/// Optical parameters of one camera candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraParams {
    pub direction: Direction,
    /// Sensor clip `[width, height]` in meters.
    pub clip_shape: [f64; 2],
    /// Focal length in meters.
    pub focal_len: f64,
    /// Image `[width, height]` in pixels.
    pub resolution: [f64; 2],
    pub horizontal_resol: ResolutionRange,
    pub vertical_resol: ResolutionRange,
    /// Cost of deploying a camera at this pose.
    pub cost: f64,
}

impl CameraParams {
    /// Build parameters from loosely typed tuples, checking their arity.
    #[allow(clippy::too_many_arguments)]
    pub fn from_slices(
        index: usize,
        direction: &[f64],
        clip_shape: &[f64],
        focal_len: f64,
        resolution: &[f64],
        horizontal_resol: &[f64],
        vertical_resol: &[f64],
        cost: f64,
    ) -> Result<Self, ConfigError> {
        let [pan, tilt] = pair("directions", index, direction)?;
        let [h_min, h_max] = pair("horizontal_resols", index, horizontal_resol)?;
        let [v_min, v_max] = pair("vertical_resols", index, vertical_resol)?;

        Ok(Self {
            direction: Direction::new(pan, tilt),
            clip_shape: pair("clip_shapes", index, clip_shape)?,
            focal_len,
            resolution: pair("resolutions", index, resolution)?,
            horizontal_resol: ResolutionRange::new(h_min, h_max),
            vertical_resol: ResolutionRange::new(v_min, v_max),
            cost,
        })
    }
}

fn pair(field: &'static str, index: usize, values: &[f64]) -> Result<[f64; 2], ConfigError> {
    match *values {
        [a, b] => Ok([a, b]),
        _ => Err(ConfigError::WrongArity {
            field,
            index,
            expected: 2,
            actual: values.len(),
        }),
    }
}

/// A camera candidate with its derived geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleCamera {
    direction: Direction,
    dof: Dof,
    horizontal_angle: f64,
    vertical_angle: f64,
    cost: f64,
}

impl SingleCamera {
    /// Derive DOF and FOV for the camera at candidate `index`.
    ///
    /// Inverted resolution ranges are accepted and reported through
    /// `diagnostics`; the resulting DOF is empty or inverted.
    pub fn new(params: &CameraParams, index: usize, diagnostics: &Diagnostics) -> Self {
        for (axis, range) in [
            ("horizontal", params.horizontal_resol),
            ("vertical", params.vertical_resol),
        ] {
            if range.is_inverted() {
                diagnostics.warn(
                    DiagnosticKind::InvertedResolutionRange,
                    format!(
                        "camera {}: {} resolution requirement min {} >= max {}",
                        index, axis, range.min, range.max
                    ),
                );
            }
        }

        let [clip_width, clip_height] = params.clip_shape;

        Self {
            direction: params.direction,
            dof: compute_dof(params),
            horizontal_angle: 2.0 * (clip_width / params.focal_len / 2.0).atan(),
            vertical_angle: 2.0 * (clip_height / params.focal_len / 2.0).atan(),
            cost: params.cost,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn dof(&self) -> Dof {
        self.dof
    }

    /// Horizontal FOV angle in radians.
    pub fn horizontal_angle(&self) -> f64 {
        self.horizontal_angle
    }

    /// Vertical FOV angle in radians.
    pub fn vertical_angle(&self) -> f64 {
        self.vertical_angle
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// A camera with a zero far limit cannot see anything.
    pub fn is_available(&self) -> bool {
        self.dof.far != 0.0
    }
}

/// Distance range in which both resolution requirements hold.
///
/// A zero clip side or a zero requirement bound makes the pose unusable.
fn compute_dof(params: &CameraParams) -> Dof {
    let [clip_width, clip_height] = params.clip_shape;
    let [res_width, res_height] = params.resolution;
    let h = params.horizontal_resol;
    let v = params.vertical_resol;
    let f = params.focal_len;

    if [clip_width, clip_height, h.min, h.max, v.min, v.max].contains(&0.0) {
        return Dof::ZERO;
    }

    let near = (f * (res_width / h.max) / clip_width).max(f * (res_height / v.max) / clip_height);
    let far = (f * (res_width / h.min) / clip_width).min(f * (res_height / v.min) / clip_height);

    Dof::new(near, far)
}
