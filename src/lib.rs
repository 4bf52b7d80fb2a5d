//! Camera Coverage Library
//!
//! Voxel-space visibility engine for surveillance camera placement.
//! Given an occupancy grid and one camera candidate per voxel, computes which
//! target voxels every camera can see and exposes the result as a set-cover
//! problem for an external optimizer.

pub mod camera;
pub mod config;
pub mod diagnostics;
pub mod environment;
pub mod error;
pub mod export;
pub mod problem;
pub mod registry;
pub mod telemetry;
pub mod visibility;
pub mod voxel;

pub use camera::{CameraCandidates, CameraParams, Direction, Dof, ResolutionRange, SingleCamera};
pub use config::{load_run_config, save_run_config, RunConfig};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use environment::VoxelEnvironment;
pub use error::{ConfigError, ExportError, ProblemError, RunError, VisibilityError};
pub use problem::{CoverageProblem, Evaluation};
pub use registry::{build_run, ProviderRegistry, RunOutput};
pub use visibility::{compute_visibility, RunControl, VisibilityEngine, VisibilityEvent, VisibilityMatrix};
pub use voxel::{voxel_to_cartesian, GridShape};
