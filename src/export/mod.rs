//! Saving and loading visibility results.
//!
//! Visibility matrices are stored as a small header (magic bytes and a
//! format version) followed by an lz4-compressed bincode payload. A JSON
//! summary report can be written next to it for humans and scripts.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::camera::CameraCandidates;
use crate::diagnostics::Diagnostic;
use crate::environment::VoxelEnvironment;
use crate::error::ExportError;
use crate::visibility::{BinaryMatrix, VisibilityMatrix};
use crate::voxel::GridShape;

/// Leading bytes of every visibility file.
pub const VISIBILITY_MAGIC: [u8; 4] = *b"VMAT";

/// Current visibility file format version.
pub const VISIBILITY_VERSION: u32 = 1;

const HEADER_LEN: usize = 8;

/// Payload of a visibility file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct VisibilityPayload {
    shape: GridShape,
    voxel_len: f64,
    /// Row-major 0/1 entries, row = target, column = camera.
    value: Vec<u8>,
    target_mask: Vec<u8>,
}

/// A loaded visibility file.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityFile {
    pub shape: GridShape,
    pub voxel_len: f64,
    pub visibility: VisibilityMatrix,
}

/// Encode a visibility matrix into the on-disk byte format.
pub fn encode_visibility(env: &VoxelEnvironment, visibility: &VisibilityMatrix) -> Result<Vec<u8>, ExportError> {
    if visibility.num_voxels() != env.num_voxels() {
        return Err(ExportError::Corrupt(format!(
            "matrix covers {} voxels but the environment has {}",
            visibility.num_voxels(),
            env.num_voxels()
        )));
    }

    let payload = VisibilityPayload {
        shape: *env.shape(),
        voxel_len: env.voxel_len(),
        value: visibility.value().data().to_vec(),
        target_mask: visibility.target_mask().to_vec(),
    };
    let encoded = bincode::serialize(&payload)?;
    let compressed = lz4_flex::compress_prepend_size(&encoded);

    let mut bytes = Vec::with_capacity(HEADER_LEN + compressed.len());
    bytes.extend_from_slice(&VISIBILITY_MAGIC);
    bytes.extend_from_slice(&VISIBILITY_VERSION.to_le_bytes());
    bytes.extend_from_slice(&compressed);
    Ok(bytes)
}

/// Decode bytes produced by [`encode_visibility`], checking every invariant
/// of the stored matrix.
pub fn decode_visibility(bytes: &[u8]) -> Result<VisibilityFile, ExportError> {
    if bytes.len() < HEADER_LEN || bytes[..4] != VISIBILITY_MAGIC {
        return Err(ExportError::BadMagic);
    }
    let mut version = [0u8; 4];
    version.copy_from_slice(&bytes[4..HEADER_LEN]);
    let version = u32::from_le_bytes(version);
    if version != VISIBILITY_VERSION {
        return Err(ExportError::UnsupportedVersion(version));
    }

    let encoded = lz4_flex::decompress_size_prepended(&bytes[HEADER_LEN..])?;
    let payload: VisibilityPayload = bincode::deserialize(&encoded)?;

    let n = payload.shape.num_voxels();
    let value = BinaryMatrix::from_data(n, n, payload.value)
        .ok_or_else(|| ExportError::Corrupt("visibility entries do not fit the grid".to_string()))?;
    let visibility = VisibilityMatrix::from_parts(value, payload.target_mask)
        .ok_or_else(|| ExportError::Corrupt("target mask does not fit the grid".to_string()))?;

    Ok(VisibilityFile {
        shape: payload.shape,
        voxel_len: payload.voxel_len,
        visibility,
    })
}

/// Save a visibility matrix for the given environment.
pub fn save_visibility(
    path: &Path,
    env: &VoxelEnvironment,
    visibility: &VisibilityMatrix,
) -> Result<(), ExportError> {
    let bytes = encode_visibility(env, visibility)?;
    fs::write(path, &bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "Saved visibility matrix");
    Ok(())
}

pub fn load_visibility(path: &Path) -> Result<VisibilityFile, ExportError> {
    let bytes = fs::read(path)?;
    decode_visibility(&bytes)
}

/// Human-readable summary of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilityReport {
    pub shape: [usize; 3],
    pub voxel_len: f64,
    pub voxels: usize,
    pub occupied_voxels: usize,
    pub target_voxels: usize,
    pub available_cameras: usize,
    /// Ones in the raw matrix.
    pub visible_pairs: usize,
    /// Ones in target rows only.
    pub visible_target_pairs: usize,
    /// Targets that no camera sees.
    pub unseen_targets: usize,
    /// Visible target count per camera, in voxel order.
    pub targets_per_camera: Vec<usize>,
    pub warnings: Vec<String>,
}

impl VisibilityReport {
    pub fn new(
        env: &VoxelEnvironment,
        cameras: &CameraCandidates,
        visibility: &VisibilityMatrix,
        diagnostics: &[Diagnostic],
    ) -> Self {
        let masked = visibility.masked_value();
        let unseen_targets = visibility
            .target_mask()
            .iter()
            .enumerate()
            .filter(|&(t, &flag)| flag == 1 && !masked.row(t).contains(&1))
            .count();

        Self {
            shape: env.shape().as_array(),
            voxel_len: env.voxel_len(),
            voxels: env.num_voxels(),
            occupied_voxels: env.occupied_count(),
            target_voxels: env.target_count(),
            available_cameras: cameras.available_count(),
            visible_pairs: visibility.value().count_ones(),
            visible_target_pairs: masked.count_ones(),
            unseen_targets,
            targets_per_camera: (0..visibility.num_voxels())
                .map(|c| visibility.visible_targets(c))
                .collect(),
            warnings: diagnostics
                .iter()
                .map(|d| format!("{}: {}", d.kind.display_name(), d.message))
                .collect(),
        }
    }
}

/// Write a report as pretty-printed JSON.
pub fn write_report(path: &Path, report: &VisibilityReport) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}
