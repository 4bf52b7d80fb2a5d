//! Voxelized surveillance space.

use glam::IVec3;

use crate::error::ConfigError;
use crate::voxel::GridShape;

/// Grid shape, occupancy, voxel size and optional target mask.
///
/// Immutable once built; all per-voxel arrays are guaranteed to match the
/// grid volume.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelEnvironment {
    shape: GridShape,
    occupancy: Vec<bool>,
    voxel_len: f64,
    targets: Option<Vec<bool>>,
}

impl VoxelEnvironment {
    /// Build an environment from raw flags, nonzero meaning occupied/target.
    ///
    /// `targets == None` makes every voxel a target.
    pub fn new(
        shape: GridShape,
        occupancy: &[u8],
        voxel_len: f64,
        targets: Option<&[u8]>,
    ) -> Result<Self, ConfigError> {
        let expected = shape.num_voxels();

        if occupancy.len() != expected {
            return Err(ConfigError::VoxelCountMismatch {
                field: "occupancy",
                expected,
                actual: occupancy.len(),
            });
        }
        if let Some(targets) = targets {
            if targets.len() != expected {
                return Err(ConfigError::VoxelCountMismatch {
                    field: "targets",
                    expected,
                    actual: targets.len(),
                });
            }
        }
        if !(voxel_len > 0.0 && voxel_len.is_finite()) {
            return Err(ConfigError::InvalidVoxelLength(voxel_len));
        }

        Ok(Self {
            shape,
            occupancy: occupancy.iter().map(|&v| v != 0).collect(),
            voxel_len,
            targets: targets.map(|t| t.iter().map(|&v| v != 0).collect()),
        })
    }

    /// Build an environment from a `[width, height, depth]` slice.
    pub fn from_dims(
        dims: &[usize],
        occupancy: &[u8],
        voxel_len: f64,
        targets: Option<&[u8]>,
    ) -> Result<Self, ConfigError> {
        Self::new(GridShape::from_dims(dims)?, occupancy, voxel_len, targets)
    }

    /// An empty (unoccupied) grid where every voxel is a target.
    pub fn empty(shape: GridShape, voxel_len: f64) -> Result<Self, ConfigError> {
        Self::new(shape, &vec![0; shape.num_voxels()], voxel_len, None)
    }

    pub fn shape(&self) -> &GridShape {
        &self.shape
    }

    pub fn num_voxels(&self) -> usize {
        self.occupancy.len()
    }

    /// Side length of a voxel in meters.
    pub fn voxel_len(&self) -> f64 {
        self.voxel_len
    }

    pub fn occupancy(&self) -> &[bool] {
        &self.occupancy
    }

    pub fn is_occupied(&self, index: usize) -> bool {
        self.occupancy.get(index).copied().unwrap_or(false)
    }

    /// Occupancy at a voxel coordinate; anything outside the grid is empty.
    pub fn is_occupied_at(&self, coord: IVec3) -> bool {
        self.shape
            .linear_index(coord)
            .map(|index| self.occupancy[index])
            .unwrap_or(false)
    }

    pub fn targets(&self) -> Option<&[bool]> {
        self.targets.as_deref()
    }

    /// Whether a voxel is an optimization target.
    pub fn is_target(&self, index: usize) -> bool {
        match &self.targets {
            Some(targets) => targets.get(index).copied().unwrap_or(false),
            None => index < self.num_voxels(),
        }
    }

    pub fn target_count(&self) -> usize {
        match &self.targets {
            Some(targets) => targets.iter().filter(|&&t| t).count(),
            None => self.num_voxels(),
        }
    }

    pub fn occupied_count(&self) -> usize {
        self.occupancy.iter().filter(|&&o| o).count()
    }
}
