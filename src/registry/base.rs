//! Built-in "base" providers.

use crate::camera::CameraCandidates;
use crate::config::{CameraConfig, EnvironmentConfig, VisibilityConfig, BASE_PROVIDER};
use crate::diagnostics::Diagnostics;
use crate::environment::VoxelEnvironment;
use crate::error::{ConfigError, VisibilityError};
use crate::visibility::{RunControl, VisibilityEngine, VisibilityMatrix};

use super::traits::{CameraSetProvider, EnvironmentProvider, VisibilityProvider};

/// Environment taken verbatim from the configured arrays.
#[derive(Debug, Default)]
pub struct BaseEnvironment;

impl EnvironmentProvider for BaseEnvironment {
    fn type_name(&self) -> &'static str {
        BASE_PROVIDER
    }

    fn build(&self, config: &EnvironmentConfig) -> Result<VoxelEnvironment, ConfigError> {
        config.build()
    }
}

/// One camera per voxel from index-aligned parameter arrays.
#[derive(Debug, Default)]
pub struct BaseCameraSet;

impl CameraSetProvider for BaseCameraSet {
    fn type_name(&self) -> &'static str {
        BASE_PROVIDER
    }

    fn build(
        &self,
        config: &CameraConfig,
        diagnostics: &Diagnostics,
    ) -> Result<CameraCandidates, ConfigError> {
        CameraCandidates::from_config(config, diagnostics)
    }
}

/// Ray-marching visibility engine.
#[derive(Debug, Default)]
pub struct BaseVisibility;

impl VisibilityProvider for BaseVisibility {
    fn type_name(&self) -> &'static str {
        BASE_PROVIDER
    }

    fn compute(
        &self,
        env: &VoxelEnvironment,
        cameras: &CameraCandidates,
        config: &VisibilityConfig,
        diagnostics: &Diagnostics,
        control: &RunControl,
    ) -> Result<VisibilityMatrix, VisibilityError> {
        VisibilityEngine::new(config.engine_config()).compute(env, cameras, diagnostics, control)
    }
}
