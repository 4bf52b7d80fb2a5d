//! Camera-to-target visibility.
//!
//! For every (target, camera) voxel pair the engine checks, in order:
//! - the camera is available (non-zero far DOF limit)
//! - the target lies inside the camera's field-of-view cone
//! - the target distance lies inside the camera's depth of field
//! - no occupied voxel sits on the line of sight (ray march)
//!
//! Pairs are independent, so camera columns are spread over a fixed pool of
//! worker threads.

mod control;
mod engine;
mod geometry;
mod matrix;
mod occlusion;

pub use control::{RunControl, VisibilityEvent};
pub use engine::{
    compute_visibility, EngineConfig, VisibilityEngine, DEFAULT_SAMPLE_STEP, MAX_SAFE_SAMPLE_STEP,
};
pub use geometry::{angle_of_view, in_depth_of_field, in_field_of_view, AngleOfView};
pub use matrix::{BinaryMatrix, VisibilityMatrix};
pub use occlusion::{is_blocked, line_of_sight};
