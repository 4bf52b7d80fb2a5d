//! Provider traits for the pluggable pipeline stages.
//!
//! Each stage of a run is resolved by the `type` name in its configuration
//! section. Implementations must be `Send + Sync` so a registry can be
//! shared between threads.

use crate::camera::CameraCandidates;
use crate::config::{CameraConfig, EnvironmentConfig, VisibilityConfig};
use crate::diagnostics::Diagnostics;
use crate::environment::VoxelEnvironment;
use crate::error::{ConfigError, VisibilityError};
use crate::visibility::{RunControl, VisibilityMatrix};

/// Builds the voxel environment of a run.
pub trait EnvironmentProvider: Send + Sync {
    /// Name matched against `environment.type` (e.g., "base")
    fn type_name(&self) -> &'static str;

    fn build(&self, config: &EnvironmentConfig) -> Result<VoxelEnvironment, ConfigError>;
}

/// Builds the camera candidate set of a run.
pub trait CameraSetProvider: Send + Sync {
    /// Name matched against `cameras.type`
    fn type_name(&self) -> &'static str;

    fn build(
        &self,
        config: &CameraConfig,
        diagnostics: &Diagnostics,
    ) -> Result<CameraCandidates, ConfigError>;
}

/// Computes the visibility matrix of a run.
pub trait VisibilityProvider: Send + Sync {
    /// Name matched against `visibility.type`
    fn type_name(&self) -> &'static str;

    fn compute(
        &self,
        env: &VoxelEnvironment,
        cameras: &CameraCandidates,
        config: &VisibilityConfig,
        diagnostics: &Diagnostics,
        control: &RunControl,
    ) -> Result<VisibilityMatrix, VisibilityError>;
}
