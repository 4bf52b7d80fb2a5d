//! Error types shared across the crate.

use thiserror::Error;

/// Invalid or inconsistent input. Construction of the offending component is
/// aborted and no partial result is produced.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("`shape` should be [width, height, depth], got {0} dimensions")]
    InvalidShape(usize),
    #[error("every axis of the grid must hold at least one voxel, got {0:?}")]
    EmptyAxis([usize; 3]),
    #[error("`{field}` holds {actual} voxels but the grid has {expected}")]
    VoxelCountMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("voxel_len should be a positive length in meters, got {0}")]
    InvalidVoxelLength(f64),
    #[error("camera {index}: `{field}` needs exactly {expected} values, got {actual}")]
    WrongArity {
        field: &'static str,
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("inconsistent camera settings: `{field}` has {actual} entries, expected {expected}")]
    CameraArrayMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("no {kind} provider registered under `{name}`")]
    UnknownProvider { kind: &'static str, name: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::DeError),
    #[error("XML write error: {0}")]
    XmlWrite(#[from] quick_xml::SeError),
}

/// Failures of a visibility computation.
#[derive(Error, Debug)]
pub enum VisibilityError {
    #[error("got {cameras} camera candidates for {voxels} voxels")]
    CameraCountMismatch { cameras: usize, voxels: usize },
    #[error("sample_step should be a positive number of voxels, got {0}")]
    InvalidSampleStep(f64),
    #[error("visibility computation was cancelled")]
    Cancelled,
    #[error("a visibility worker thread panicked")]
    WorkerFailed,
}

/// Failures while building or evaluating a coverage problem.
#[derive(Error, Debug, PartialEq)]
pub enum ProblemError {
    #[error("`{field}` has {actual} entries, expected {expected}")]
    DimensionMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("variable {index} = {value} lies outside its bounds")]
    OutOfBounds { index: usize, value: f64 },
}

/// Failures while saving or loading visibility results.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encoding error: {0}")]
    Encode(#[from] bincode::Error),
    #[error("decompression error: {0}")]
    Decompress(#[from] lz4_flex::block::DecompressError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("not a visibility file")]
    BadMagic,
    #[error("unsupported visibility file version {0}")]
    UnsupportedVersion(u32),
    #[error("corrupt visibility file: {0}")]
    Corrupt(String),
}

/// Failure anywhere in a configured run.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Visibility(#[from] VisibilityError),
}
