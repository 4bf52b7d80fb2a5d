//! Parallel visibility matrix computation.
//!
//! A fixed pool of scoped worker threads pulls camera columns from a shared
//! counter, evaluates the column against every target voxel and sends it to
//! the collecting thread over a channel. Each cell depends only on its own
//! (target, camera) pair, so the result does not depend on the pool size.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;

use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::camera::{CameraCandidates, SingleCamera};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::environment::VoxelEnvironment;
use crate::error::VisibilityError;
use crate::voxel::voxel_to_cartesian;

use super::control::{RunControl, VisibilityEvent};
use super::geometry::{angle_of_view, in_depth_of_field, in_field_of_view};
use super::matrix::{BinaryMatrix, VisibilityMatrix};
use super::occlusion::line_of_sight;

/// Default ray-march step in voxels.
pub const DEFAULT_SAMPLE_STEP: f64 = 0.2;

/// Steps above this may jump over a single-voxel obstacle.
pub const MAX_SAFE_SAMPLE_STEP: f64 = 0.5;

/// Engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Ray-march step in voxels.
    pub sample_step: f64,
    /// Worker threads, 0 = one per available core.
    pub workers: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_step: DEFAULT_SAMPLE_STEP,
            workers: 0,
        }
    }
}

/// Computes visibility matrices for a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct VisibilityEngine {
    config: EngineConfig,
}

impl VisibilityEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn worker_count(&self, columns: usize) -> usize {
        let wanted = if self.config.workers == 0 {
            thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            self.config.workers
        };
        wanted.clamp(1, columns.max(1))
    }

    /// Compute which target voxels every camera candidate sees.
    ///
    /// `cameras` must hold exactly one candidate per voxel. A coarse sample
    /// step is reported through `diagnostics`; cancellation through
    /// `control` returns [`VisibilityError::Cancelled`] without a partial
    /// result.
    pub fn compute(
        &self,
        env: &VoxelEnvironment,
        cameras: &CameraCandidates,
        diagnostics: &Diagnostics,
        control: &RunControl,
    ) -> Result<VisibilityMatrix, VisibilityError> {
        let num_voxels = env.num_voxels();
        if cameras.len() != num_voxels {
            return Err(VisibilityError::CameraCountMismatch {
                cameras: cameras.len(),
                voxels: num_voxels,
            });
        }

        let sample_step = self.config.sample_step;
        if !(sample_step > 0.0 && sample_step.is_finite()) {
            return Err(VisibilityError::InvalidSampleStep(sample_step));
        }
        if sample_step > MAX_SAFE_SAMPLE_STEP {
            diagnostics.warn(
                DiagnosticKind::CoarseSampleStep,
                format!(
                    "sampling step over {} may miss thin obstacles, current sample_step == {}",
                    MAX_SAFE_SAMPLE_STEP, sample_step
                ),
            );
        }

        let started = Instant::now();
        let cartesian = voxel_to_cartesian(env.shape());
        let workers = self.worker_count(num_voxels);

        tracing::info!(
            voxels = num_voxels,
            available_cameras = cameras.available_count(),
            workers,
            sample_step,
            "Computing visibility matrix"
        );
        control.emit(VisibilityEvent::Started {
            cameras: num_voxels,
        });

        let next_column = AtomicUsize::new(0);
        let (column_tx, column_rx) = crossbeam_channel::bounded::<(usize, Vec<u8>)>(workers * 2);
        let mut value = BinaryMatrix::zeros(num_voxels, num_voxels);
        let mut completed = 0;

        let worker_failed = thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    let column_tx = column_tx.clone();
                    let next_column = &next_column;
                    let cartesian = &cartesian;
                    scope.spawn(move || loop {
                        if control.is_cancelled() {
                            break;
                        }
                        let camera = next_column.fetch_add(1, Ordering::Relaxed);
                        if camera >= num_voxels {
                            break;
                        }
                        let column = evaluate_column(env, cameras, cartesian, camera, sample_step);
                        if column_tx.send((camera, column)).is_err() {
                            break;
                        }
                    })
                })
                .collect();

            // Only the workers hold senders now; the loop ends when they exit.
            drop(column_tx);

            for (camera, column) in column_rx.iter() {
                value.set_column(camera, &column);
                completed += 1;
                control.emit(VisibilityEvent::ColumnComplete {
                    camera,
                    completed,
                    total: num_voxels,
                });
            }

            handles.into_iter().any(|handle| handle.join().is_err())
        });

        if worker_failed {
            tracing::error!("Visibility worker panicked");
            return Err(VisibilityError::WorkerFailed);
        }
        if completed < num_voxels {
            tracing::warn!(completed, total = num_voxels, "Visibility computation cancelled");
            control.emit(VisibilityEvent::Cancelled { completed });
            return Err(VisibilityError::Cancelled);
        }

        let matrix = VisibilityMatrix::new(value, env.targets());
        let visible_pairs = matrix.value().count_ones();

        tracing::info!(
            visible_pairs,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Visibility matrix successfully built"
        );
        control.emit(VisibilityEvent::Finished { visible_pairs });

        Ok(matrix)
    }
}

/// One-shot computation with default worker count and no progress events.
pub fn compute_visibility(
    env: &VoxelEnvironment,
    cameras: &CameraCandidates,
    sample_step: f64,
    diagnostics: &Diagnostics,
) -> Result<VisibilityMatrix, VisibilityError> {
    let engine = VisibilityEngine::new(EngineConfig {
        sample_step,
        ..EngineConfig::default()
    });
    engine.compute(env, cameras, diagnostics, &RunControl::new())
}

/// Visibility of every target from the camera at voxel `camera`.
fn evaluate_column(
    env: &VoxelEnvironment,
    cameras: &CameraCandidates,
    cartesian: &[IVec3],
    camera: usize,
    sample_step: f64,
) -> Vec<u8> {
    let mut column = vec![0u8; cartesian.len()];

    let Some(model) = cameras.get(camera) else {
        return column;
    };
    if !model.is_available() {
        return column;
    }

    let origin = cartesian[camera];
    for (target, &coord) in cartesian.iter().enumerate() {
        if pair_visible(env, model, origin, coord, sample_step) {
            column[target] = 1;
        }
    }
    column
}

fn pair_visible(
    env: &VoxelEnvironment,
    camera: &SingleCamera,
    origin: IVec3,
    target: IVec3,
    sample_step: f64,
) -> bool {
    let diff = (target - origin).as_dvec3();
    let Some(aov) = angle_of_view(diff) else {
        return false;
    };

    in_field_of_view(&aov, camera)
        && in_depth_of_field(diff, env.voxel_len(), camera.dof())
        && line_of_sight(env, origin, target, sample_step)
}
