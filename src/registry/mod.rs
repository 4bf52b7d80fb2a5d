//! Provider registry for pluggable environments, camera sets and engines
//!
//! The registry maps the `type` names found in a [`RunConfig`] to provider
//! implementations. [`ProviderRegistry::with_builtins`] registers the
//! "base" provider of every stage; further providers can be added at
//! startup.

mod base;
mod traits;

use std::collections::HashMap;
use std::sync::Arc;

pub use base::{BaseCameraSet, BaseEnvironment, BaseVisibility};
pub use traits::{CameraSetProvider, EnvironmentProvider, VisibilityProvider};

use crate::camera::CameraCandidates;
use crate::config::RunConfig;
use crate::diagnostics::Diagnostics;
use crate::environment::VoxelEnvironment;
use crate::error::{ConfigError, RunError};
use crate::visibility::{RunControl, VisibilityMatrix};

/// Registry of available providers, keyed by type name
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    environments: HashMap<String, Arc<dyn EnvironmentProvider>>,
    camera_sets: HashMap<String, Arc<dyn CameraSetProvider>>,
    engines: HashMap<String, Arc<dyn VisibilityProvider>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in "base" providers
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_environment(BaseEnvironment);
        registry.register_camera_set(BaseCameraSet);
        registry.register_visibility(BaseVisibility);
        registry
    }

    /// Register an environment provider, replacing any with the same name
    pub fn register_environment(&mut self, provider: impl EnvironmentProvider + 'static) {
        self.environments
            .insert(provider.type_name().to_string(), Arc::new(provider));
    }

    pub fn register_camera_set(&mut self, provider: impl CameraSetProvider + 'static) {
        self.camera_sets
            .insert(provider.type_name().to_string(), Arc::new(provider));
    }

    pub fn register_visibility(&mut self, provider: impl VisibilityProvider + 'static) {
        self.engines
            .insert(provider.type_name().to_string(), Arc::new(provider));
    }

    pub fn environment(&self, name: &str) -> Result<Arc<dyn EnvironmentProvider>, ConfigError> {
        self.environments
            .get(name)
            .cloned()
            .ok_or_else(|| unknown("environment", name))
    }

    pub fn camera_set(&self, name: &str) -> Result<Arc<dyn CameraSetProvider>, ConfigError> {
        self.camera_sets
            .get(name)
            .cloned()
            .ok_or_else(|| unknown("camera set", name))
    }

    pub fn visibility(&self, name: &str) -> Result<Arc<dyn VisibilityProvider>, ConfigError> {
        self.engines
            .get(name)
            .cloned()
            .ok_or_else(|| unknown("visibility", name))
    }

    /// Registered environment type names
    pub fn environment_types(&self) -> impl Iterator<Item = &str> {
        self.environments.keys().map(|s| s.as_str())
    }

    pub fn camera_set_types(&self) -> impl Iterator<Item = &str> {
        self.camera_sets.keys().map(|s| s.as_str())
    }

    pub fn visibility_types(&self) -> impl Iterator<Item = &str> {
        self.engines.keys().map(|s| s.as_str())
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("environments", &self.environments.keys().collect::<Vec<_>>())
            .field("camera_sets", &self.camera_sets.keys().collect::<Vec<_>>())
            .field("engines", &self.engines.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn unknown(kind: &'static str, name: &str) -> ConfigError {
    ConfigError::UnknownProvider {
        kind,
        name: name.to_string(),
    }
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub environment: VoxelEnvironment,
    pub cameras: CameraCandidates,
    pub visibility: VisibilityMatrix,
}

/// Resolve the configured providers and run the whole pipeline.
///
/// All providers are looked up before any work starts, so an unknown name
/// fails fast.
pub fn build_run(
    config: &RunConfig,
    registry: &ProviderRegistry,
    diagnostics: &Diagnostics,
    control: &RunControl,
) -> Result<RunOutput, RunError> {
    let env_provider = registry.environment(&config.environment.provider)?;
    let camera_provider = registry.camera_set(&config.cameras.provider)?;
    let engine = registry.visibility(&config.visibility.provider)?;

    let environment = env_provider.build(&config.environment)?;
    tracing::debug!(
        provider = env_provider.type_name(),
        voxels = environment.num_voxels(),
        occupied = environment.occupied_count(),
        targets = environment.target_count(),
        "Environment built"
    );

    let cameras = camera_provider.build(&config.cameras, diagnostics)?;
    tracing::debug!(
        provider = camera_provider.type_name(),
        cameras = cameras.len(),
        available = cameras.available_count(),
        "Camera candidates built"
    );

    let visibility = engine.compute(
        &environment,
        &cameras,
        &config.visibility,
        diagnostics,
        control,
    )?;

    Ok(RunOutput {
        environment,
        cameras,
        visibility,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{CameraParams, Direction, ResolutionRange};
    use crate::config::{CameraConfig, EnvironmentConfig, VisibilityConfig};
    use crate::error::VisibilityError;
    use std::f64::consts::FRAC_PI_2;

    fn run_config() -> RunConfig {
        let params = CameraParams {
            direction: Direction::new(FRAC_PI_2, 0.0),
            clip_shape: [2.0, 2.0],
            focal_len: 1.0,
            resolution: [20.0, 20.0],
            horizontal_resol: ResolutionRange::new(1.0, 1000.0),
            vertical_resol: ResolutionRange::new(1.0, 1000.0),
            cost: 1.0,
        };
        RunConfig {
            environment: EnvironmentConfig {
                provider: "base".to_string(),
                shape: vec![3, 1, 1],
                occupancy: vec![0, 0, 0],
                voxel_len: 1.0,
                targets: Vec::new(),
            },
            cameras: CameraConfig::uniform(3, &params),
            visibility: VisibilityConfig::default(),
        }
    }

    // Engine that sees nothing, to check lookups by name
    struct BlindVisibility;

    impl VisibilityProvider for BlindVisibility {
        fn type_name(&self) -> &'static str {
            "blind"
        }

        fn compute(
            &self,
            env: &VoxelEnvironment,
            _cameras: &CameraCandidates,
            _config: &VisibilityConfig,
            _diagnostics: &Diagnostics,
            _control: &RunControl,
        ) -> Result<VisibilityMatrix, VisibilityError> {
            let n = env.num_voxels();
            let value = crate::visibility::BinaryMatrix::zeros(n, n);
            Ok(VisibilityMatrix::from_parts(value, vec![1; n]).unwrap())
        }
    }

    #[test]
    fn test_builtins_registered() {
        let registry = ProviderRegistry::with_builtins();
        assert_eq!(registry.environment("base").unwrap().type_name(), "base");
        assert_eq!(registry.camera_set("base").unwrap().type_name(), "base");
        assert_eq!(registry.visibility("base").unwrap().type_name(), "base");
        assert_eq!(registry.visibility_types().count(), 1);
    }

    #[test]
    fn test_empty_registry_rejects_everything() {
        let registry = ProviderRegistry::new();
        let Err(err) = registry.environment("base") else {
            panic!("empty registry resolved a provider");
        };
        assert!(matches!(
            err,
            ConfigError::UnknownProvider { kind: "environment", ref name } if name == "base"
        ));
    }

    #[test]
    fn test_build_run_with_builtins() {
        let output = build_run(
            &run_config(),
            &ProviderRegistry::with_builtins(),
            &Diagnostics::new(),
            &RunControl::new(),
        )
        .unwrap();

        assert_eq!(output.environment.num_voxels(), 3);
        assert_eq!(output.cameras.len(), 3);
        assert!(output.visibility.is_visible(2, 0));
    }

    #[test]
    fn test_build_run_unknown_provider() {
        let mut config = run_config();
        config.visibility.provider = "blind".to_string();

        let result = build_run(
            &config,
            &ProviderRegistry::with_builtins(),
            &Diagnostics::new(),
            &RunControl::new(),
        );
        assert!(matches!(
            result,
            Err(RunError::Config(ConfigError::UnknownProvider { kind: "visibility", .. }))
        ));
    }

    #[test]
    fn test_build_run_with_custom_provider() {
        let mut config = run_config();
        config.visibility.provider = "blind".to_string();
        let mut registry = ProviderRegistry::with_builtins();
        registry.register_visibility(BlindVisibility);

        let output = build_run(&config, &registry, &Diagnostics::new(), &RunControl::new()).unwrap();
        assert_eq!(output.visibility.value().count_ones(), 0);
    }

    #[test]
    fn test_build_run_propagates_config_errors() {
        let mut config = run_config();
        config.environment.occupancy.pop();

        let result = build_run(
            &config,
            &ProviderRegistry::with_builtins(),
            &Diagnostics::new(),
            &RunControl::new(),
        );
        assert!(matches!(
            result,
            Err(RunError::Config(ConfigError::VoxelCountMismatch { field: "occupancy", .. }))
        ));
    }
}
