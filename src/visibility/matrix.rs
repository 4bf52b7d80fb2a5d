//! Binary visibility matrices.

use serde::{Deserialize, Serialize};

/// Dense row-major matrix of 0/1 entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryMatrix {
    rows: usize,
    cols: usize,
    data: Vec<u8>,
}

impl BinaryMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    /// Build from row-major data; `None` if the length does not match or an
    /// entry is not 0/1.
    pub fn from_data(rows: usize, cols: usize, data: Vec<u8>) -> Option<Self> {
        if data.len() != rows * cols || data.iter().any(|&v| v > 1) {
            return None;
        }
        Some(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.data[row * self.cols + col]
    }

    pub fn row(&self, row: usize) -> &[u8] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn column(&self, col: usize) -> Vec<u8> {
        (0..self.rows).map(|row| self.get(row, col)).collect()
    }

    /// Row-major entries.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of entries equal to 1.
    pub fn count_ones(&self) -> usize {
        self.data.iter().filter(|&&v| v == 1).count()
    }

    pub(crate) fn set_column(&mut self, col: usize, values: &[u8]) {
        for (row, &value) in values.iter().enumerate().take(self.rows) {
            self.data[row * self.cols + col] = value;
        }
    }

    /// Elementwise product with a matrix of the same shape.
    pub fn hadamard(&self, other: &BinaryMatrix) -> BinaryMatrix {
        debug_assert_eq!((self.rows, self.cols), (other.rows, other.cols));
        BinaryMatrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| a * b)
                .collect(),
        }
    }
}

/// Visibility of every target voxel (rows) from every camera voxel
/// (columns), together with the target mask.
///
/// Immutable once computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityMatrix {
    value: BinaryMatrix,
    /// One entry per target row, 1 = optimization target.
    target_mask: Vec<u8>,
}

impl VisibilityMatrix {
    /// Pair a square visibility matrix with its target flags; absent targets
    /// mark every voxel as a target.
    pub(crate) fn new(value: BinaryMatrix, targets: Option<&[bool]>) -> Self {
        let target_mask = match targets {
            Some(targets) => targets.iter().map(|&t| u8::from(t)).collect(),
            None => vec![1; value.rows()],
        };
        Self { value, target_mask }
    }

    /// Rebuild from stored parts; `None` if they do not fit together.
    pub fn from_parts(value: BinaryMatrix, target_mask: Vec<u8>) -> Option<Self> {
        if value.rows() != value.cols()
            || target_mask.len() != value.rows()
            || target_mask.iter().any(|&t| t > 1)
        {
            return None;
        }
        Some(Self { value, target_mask })
    }

    pub fn num_voxels(&self) -> usize {
        self.value.rows()
    }

    /// Raw visibility, row = target voxel, column = camera voxel.
    pub fn value(&self) -> &BinaryMatrix {
        &self.value
    }

    pub fn target_mask(&self) -> &[u8] {
        &self.target_mask
    }

    /// Mask with row `t` filled with the target flag of voxel `t`.
    pub fn mask(&self) -> BinaryMatrix {
        let n = self.num_voxels();
        let mut data = Vec::with_capacity(n * n);
        for &flag in &self.target_mask {
            data.extend(std::iter::repeat(flag).take(n));
        }
        BinaryMatrix {
            rows: n,
            cols: n,
            data,
        }
    }

    /// Visibility restricted to target rows.
    pub fn masked_value(&self) -> BinaryMatrix {
        let n = self.num_voxels();
        let mut masked = self.value.clone();
        for (row, &flag) in self.target_mask.iter().enumerate() {
            if flag == 0 {
                masked.data[row * n..(row + 1) * n].fill(0);
            }
        }
        masked
    }

    pub fn is_visible(&self, target: usize, camera: usize) -> bool {
        self.value.get(target, camera) == 1
    }

    /// Number of targets the camera at `camera` sees.
    pub fn visible_targets(&self, camera: usize) -> usize {
        (0..self.num_voxels())
            .filter(|&t| self.target_mask[t] == 1 && self.is_visible(t, camera))
            .count()
    }
}
