//! Ordered set of camera candidates, one per voxel.

use crate::config::CameraConfig;
use crate::diagnostics::Diagnostics;
use crate::error::ConfigError;

use super::single::{CameraParams, SingleCamera};

/// Camera candidates, index-aligned with the voxels of the environment:
/// candidate `i` is the camera placed at voxel `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraCandidates {
    candidates: Vec<SingleCamera>,
}

impl CameraCandidates {
    /// Build one camera per parameter set.
    pub fn new(params: &[CameraParams], diagnostics: &Diagnostics) -> Self {
        let candidates = params
            .iter()
            .enumerate()
            .map(|(index, p)| SingleCamera::new(p, index, diagnostics))
            .collect();
        Self { candidates }
    }

    /// Build from index-aligned parameter arrays, rejecting arrays of
    /// different lengths or malformed tuples.
    pub fn from_config(config: &CameraConfig, diagnostics: &Diagnostics) -> Result<Self, ConfigError> {
        let params = config.to_params()?;
        Ok(Self::new(&params, diagnostics))
    }

    /// The same camera replicated at every one of `count` voxels.
    pub fn uniform(count: usize, params: &CameraParams, diagnostics: &Diagnostics) -> Self {
        let camera = SingleCamera::new(params, 0, diagnostics);
        Self {
            candidates: vec![camera; count],
        }
    }

    pub fn candidates(&self) -> &[SingleCamera] {
        &self.candidates
    }

    pub fn get(&self, index: usize) -> Option<&SingleCamera> {
        self.candidates.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SingleCamera> {
        self.candidates.iter()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Deployment cost of every candidate, in index order.
    pub fn costs(&self) -> Vec<f64> {
        self.candidates.iter().map(|c| c.cost()).collect()
    }

    pub fn available_count(&self) -> usize {
        self.candidates.iter().filter(|c| c.is_available()).count()
    }
}
