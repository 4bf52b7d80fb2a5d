//! Voxel grid coordinates.
//!
//! Voxels are enumerated width-major: the linear index of voxel `(x, y, z)`
//! in a `width x height x depth` grid is `x * height * depth + y * depth + z`.
//! Both the enumeration in [`voxel_to_cartesian`] and every occupancy lookup
//! go through [`GridShape::linear_index`], so the two can never disagree.
//! This single convention stands in for the `shape.x * v.x + shape.y * v.y + v.z`
//! flattening once used for obstacle lookups, which did not match the
//! enumeration order and could alias distinct voxels.

use glam::{DVec3, IVec3};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Size of a voxel grid in voxels per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridShape {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
}

impl GridShape {
    /// Create a shape, rejecting empty axes.
    pub fn new(width: usize, height: usize, depth: usize) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 || depth == 0 {
            return Err(ConfigError::EmptyAxis([width, height, depth]));
        }
        Ok(Self {
            width,
            height,
            depth,
        })
    }

    /// Create a shape from a `[width, height, depth]` slice.
    pub fn from_dims(dims: &[usize]) -> Result<Self, ConfigError> {
        match *dims {
            [width, height, depth] => Self::new(width, height, depth),
            _ => Err(ConfigError::InvalidShape(dims.len())),
        }
    }

    /// Total number of voxels.
    pub fn num_voxels(&self) -> usize {
        self.width * self.height * self.depth
    }

    pub fn as_array(&self) -> [usize; 3] {
        [self.width, self.height, self.depth]
    }

    /// Whether `coord` lies inside the grid.
    pub fn contains(&self, coord: IVec3) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.z >= 0
            && (coord.x as usize) < self.width
            && (coord.y as usize) < self.height
            && (coord.z as usize) < self.depth
    }

    /// Linear index of a voxel coordinate, `None` outside the grid.
    pub fn linear_index(&self, coord: IVec3) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        let (x, y, z) = (coord.x as usize, coord.y as usize, coord.z as usize);
        Some(x * self.height * self.depth + y * self.depth + z)
    }

    /// Voxel coordinate of a linear index.
    ///
    /// Indices past the end of the grid wrap along the width axis; callers
    /// are expected to stay below [`GridShape::num_voxels`].
    pub fn coordinate(&self, index: usize) -> IVec3 {
        let plane = self.height * self.depth;
        let x = index / plane;
        let y = (index % plane) / self.depth;
        let z = index % self.depth;
        IVec3::new(x as i32, y as i32, z as i32)
    }
}

/// Coordinates of every voxel, in linear index order.
pub fn voxel_to_cartesian(shape: &GridShape) -> Vec<IVec3> {
    let mut cartesian = Vec::with_capacity(shape.num_voxels());
    for w in 0..shape.width {
        for h in 0..shape.height {
            for d in 0..shape.depth {
                cartesian.push(IVec3::new(w as i32, h as i32, d as i32));
            }
        }
    }
    cartesian
}

/// Unit vector with the direction of `vector`.
///
/// Returns `None` for a zero-length (or non-finite) vector, which happens
/// when a camera and a target share a voxel.
pub fn normalize(vector: DVec3) -> Option<DVec3> {
    vector.try_normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_validation() {
        assert!(GridShape::from_dims(&[3, 4, 5]).is_ok());
        assert!(matches!(
            GridShape::from_dims(&[3, 4]),
            Err(ConfigError::InvalidShape(2))
        ));
        assert!(matches!(
            GridShape::from_dims(&[3, 4, 5, 6]),
            Err(ConfigError::InvalidShape(4))
        ));
        assert!(matches!(
            GridShape::from_dims(&[3, 0, 5]),
            Err(ConfigError::EmptyAxis([3, 0, 5]))
        ));
    }

    #[test]
    fn test_cartesian_enumeration_order() {
        let shape = GridShape::new(2, 2, 3).unwrap();
        let cartesian = voxel_to_cartesian(&shape);

        assert_eq!(cartesian.len(), 12);
        assert_eq!(cartesian[0], IVec3::new(0, 0, 0));
        assert_eq!(cartesian[1], IVec3::new(0, 0, 1));
        assert_eq!(cartesian[3], IVec3::new(0, 1, 0));
        assert_eq!(cartesian[6], IVec3::new(1, 0, 0));
        assert_eq!(cartesian[11], IVec3::new(1, 1, 2));
    }

    #[test]
    fn test_cartesian_linear_index_bijection() {
        for dims in [[1, 1, 1], [3, 1, 1], [1, 4, 2], [4, 3, 5], [2, 7, 3]] {
            let shape = GridShape::from_dims(&dims).unwrap();
            let cartesian = voxel_to_cartesian(&shape);
            assert_eq!(cartesian.len(), shape.num_voxels());

            for (index, coord) in cartesian.iter().enumerate() {
                assert_eq!(shape.linear_index(*coord), Some(index), "{:?} {:?}", dims, coord);
                assert_eq!(shape.coordinate(index), *coord);
            }
        }
    }

    #[test]
    fn test_linear_index_outside_grid() {
        let shape = GridShape::new(2, 2, 2).unwrap();
        assert_eq!(shape.linear_index(IVec3::new(-1, 0, 0)), None);
        assert_eq!(shape.linear_index(IVec3::new(0, 2, 0)), None);
        assert_eq!(shape.linear_index(IVec3::new(0, 0, 2)), None);
        assert_eq!(shape.linear_index(IVec3::new(1, 1, 1)), Some(7));
    }

    #[test]
    fn test_normalize_unit_length() {
        let vectors = [
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(3.0, 4.0, 0.0),
            DVec3::new(-2.0, 5.0, 7.0),
            DVec3::new(1e-3, -1e-3, 2e-3),
        ];
        for v in vectors {
            let unit = normalize(v).unwrap();
            assert!((unit.length() - 1.0).abs() < 1e-12);
            assert!(unit.dot(v) > 0.0);
        }
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(normalize(DVec3::ZERO), None);
    }
}
