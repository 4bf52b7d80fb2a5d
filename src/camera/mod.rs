//! Camera models and candidate sets.
//!
//! A [`SingleCamera`] derives its depth of field and field-of-view angles
//! from the sensor geometry and the resolution requirements of the
//! surveillance task. [`CameraCandidates`] holds one camera per voxel.

mod candidates;
mod single;

pub use candidates::CameraCandidates;
pub use single::{CameraParams, Direction, Dof, ResolutionRange, SingleCamera};
