//! Benchmarks for the visibility engine.
//!
//! Run with: cargo bench --bench visibility_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use camera_coverage::camera::{CameraCandidates, CameraParams, Direction, ResolutionRange};
use camera_coverage::visibility::{line_of_sight, EngineConfig, RunControl, VisibilityEngine};
use camera_coverage::{Diagnostics, GridShape, VoxelEnvironment};
use glam::IVec3;

/// Cube grid with a wall across the middle of the x axis, open in one corner.
fn walled_grid(side: usize) -> VoxelEnvironment {
    let shape = GridShape::new(side, side, side).unwrap();
    let mut occupancy = vec![0u8; shape.num_voxels()];
    let wall = (side / 2) as i32;
    for y in 0..side as i32 {
        for z in 0..side as i32 {
            if y == 0 && z == 0 {
                continue;
            }
            let index = shape.linear_index(IVec3::new(wall, y, z)).unwrap();
            occupancy[index] = 1;
        }
    }
    VoxelEnvironment::new(shape, &occupancy, 0.5, None).unwrap()
}

fn cameras(count: usize) -> CameraCandidates {
    let params = CameraParams {
        direction: Direction::new(std::f64::consts::FRAC_PI_2, 0.0),
        clip_shape: [0.036, 0.024],
        focal_len: 0.02,
        resolution: [1920.0, 1080.0],
        horizontal_resol: ResolutionRange::new(50.0, 5000.0),
        vertical_resol: ResolutionRange::new(50.0, 5000.0),
        cost: 1.0,
    };
    CameraCandidates::uniform(count, &params, &Diagnostics::new())
}

fn bench_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute");
    group.sample_size(10);

    for side in [4, 6, 8] {
        let env = walled_grid(side);
        let set = cameras(env.num_voxels());
        group.throughput(Throughput::Elements((env.num_voxels() * env.num_voxels()) as u64));

        for workers in [1, 0] {
            let engine = VisibilityEngine::new(EngineConfig {
                workers,
                ..EngineConfig::default()
            });
            let label = if workers == 1 { "single" } else { "pool" };
            group.bench_with_input(BenchmarkId::new(label, side), &side, |b, _| {
                b.iter(|| {
                    engine
                        .compute(black_box(&env), &set, &Diagnostics::new(), &RunControl::new())
                        .unwrap()
                })
            });
        }
    }

    group.finish();
}

fn bench_line_of_sight(c: &mut Criterion) {
    let env = walled_grid(16);
    let from = IVec3::new(0, 15, 15);
    let to = IVec3::new(15, 0, 3);

    c.bench_function("line_of_sight_16", |b| {
        b.iter(|| line_of_sight(black_box(&env), from, to, 0.2))
    });
}

criterion_group!(benches, bench_compute, bench_line_of_sight);
criterion_main!(benches);
