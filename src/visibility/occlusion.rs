//! Line-of-sight testing by ray marching through the occupancy grid.

use glam::{DVec3, IVec3};

use crate::environment::VoxelEnvironment;
use crate::voxel::normalize;

/// Whether a sample point falls into an occupied voxel.
///
/// Each component is rounded to the nearest voxel. A component lying exactly
/// on the face between two voxels (fractional part one half) also tests the
/// voxel on the lower side of that face, so either neighbour blocks the
/// point.
pub fn is_blocked(env: &VoxelEnvironment, sample: DVec3) -> bool {
    let voxel = sample.round().as_ivec3();
    if env.is_occupied_at(voxel) {
        return true;
    }

    for axis in 0..3 {
        if sample[axis].rem_euclid(1.0) == 0.5 {
            let mut neighbour = voxel;
            neighbour[axis] -= 1;
            if env.is_occupied_at(neighbour) {
                return true;
            }
        }
    }

    false
}

/// Axis used to decide when the march has reached the target: `x` unless
/// the ray has no `x` extent, then the axis of largest extent.
fn primary_axis(diff: DVec3) -> usize {
    if diff.x != 0.0 {
        return 0;
    }
    if diff.y.abs() >= diff.z.abs() {
        1
    } else {
        2
    }
}

/// March from `camera` toward `target` in steps of `sample_step` voxels and
/// report whether the line of sight is clear.
///
/// Sampling starts one step away from the camera and stops before the step
/// that would reach past the target along the primary axis. Every sample is
/// checked, so a sample rounding into an occupied camera or target voxel
/// blocks the ray. Coincident voxels have no line of sight.
pub fn line_of_sight(env: &VoxelEnvironment, camera: IVec3, target: IVec3, sample_step: f64) -> bool {
    let diff = (target - camera).as_dvec3();
    let Some(direction) = normalize(diff) else {
        return false;
    };

    let axis = primary_axis(diff);
    let goal = target.as_dvec3()[axis];
    let side = (camera.as_dvec3()[axis] - goal).signum();
    let step = direction * sample_step;

    let mut sample = camera.as_dvec3() + step;
    loop {
        let next = sample + step;
        let here = (sample[axis] - goal) * side;
        let ahead = (next[axis] - goal) * side;

        // The sample must still be on the camera side and the next one must
        // not overshoot the target.
        if here <= 0.0 || ahead < 0.0 {
            break;
        }
        if is_blocked(env, sample) {
            return false;
        }
        sample = next;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(occupancy: &[u8]) -> VoxelEnvironment {
        VoxelEnvironment::from_dims(&[occupancy.len(), 1, 1], occupancy, 1.0, None).unwrap()
    }

    #[test]
    fn test_rounding_picks_nearest_voxel() {
        let env = line(&[0, 1, 0]);
        assert!(!is_blocked(&env, DVec3::new(0.4, 0.0, 0.0)));
        assert!(is_blocked(&env, DVec3::new(0.6, 0.0, 0.0)));
        assert!(is_blocked(&env, DVec3::new(1.4, 0.0, 0.0)));
        assert!(!is_blocked(&env, DVec3::new(1.6, 0.0, 0.0)));
    }

    #[test]
    fn test_shared_face_blocked_by_either_voxel() {
        // 0.5 rounds up into voxel 1, the lower neighbour is voxel 0
        let lower = line(&[1, 0, 0]);
        assert!(is_blocked(&lower, DVec3::new(0.5, 0.0, 0.0)));

        let upper = line(&[0, 1, 0]);
        assert!(is_blocked(&upper, DVec3::new(0.5, 0.0, 0.0)));

        let neither = line(&[0, 0, 1]);
        assert!(!is_blocked(&neither, DVec3::new(0.5, 0.0, 0.0)));
    }

    #[test]
    fn test_shared_face_on_inner_axes() {
        let mut occupancy = vec![0u8; 8];
        let env_shape = crate::voxel::GridShape::new(2, 2, 2).unwrap();
        occupancy[env_shape.linear_index(IVec3::new(0, 0, 0)).unwrap()] = 1;
        let env = VoxelEnvironment::new(env_shape, &occupancy, 1.0, None).unwrap();

        assert!(is_blocked(&env, DVec3::new(0.0, 0.5, 0.0)));
        assert!(is_blocked(&env, DVec3::new(0.0, 0.0, 0.5)));
        assert!(!is_blocked(&env, DVec3::new(0.0, 0.6, 0.0)));
    }

    #[test]
    fn test_outside_grid_never_blocks() {
        let env = line(&[1, 1, 1]);
        assert!(!is_blocked(&env, DVec3::new(5.0, 0.0, 0.0)));
        assert!(!is_blocked(&env, DVec3::new(0.0, 2.0, 0.0)));
    }

    #[test]
    fn test_clear_and_blocked_line() {
        let clear = line(&[0, 0, 0, 0]);
        assert!(line_of_sight(&clear, IVec3::ZERO, IVec3::new(3, 0, 0), 0.2));

        let blocked = line(&[0, 0, 1, 0]);
        assert!(!line_of_sight(&blocked, IVec3::ZERO, IVec3::new(3, 0, 0), 0.2));
        assert!(!line_of_sight(&blocked, IVec3::new(3, 0, 0), IVec3::ZERO, 0.2));
        assert!(line_of_sight(&blocked, IVec3::ZERO, IVec3::new(1, 0, 0), 0.2));
    }

    #[test]
    fn test_occupied_target_blocks_its_own_ray() {
        // the sample at 0.6 already rounds into the target voxel
        let env = line(&[0, 1, 0]);
        assert!(!line_of_sight(&env, IVec3::ZERO, IVec3::new(1, 0, 0), 0.2));
    }

    #[test]
    fn test_occupied_camera_voxel_blocks() {
        let env = line(&[1, 0, 0]);
        assert!(!line_of_sight(&env, IVec3::ZERO, IVec3::new(2, 0, 0), 0.2));

        // a step long enough to leave the camera voxel at once
        assert!(line_of_sight(&env, IVec3::ZERO, IVec3::new(2, 0, 0), 0.6));
    }

    #[test]
    fn test_march_without_x_extent_terminates() {
        let shape = crate::voxel::GridShape::new(1, 4, 1).unwrap();
        let clear = VoxelEnvironment::new(shape, &[0, 0, 0, 0], 1.0, None).unwrap();
        assert!(line_of_sight(&clear, IVec3::ZERO, IVec3::new(0, 3, 0), 0.2));

        let blocked = VoxelEnvironment::new(shape, &[0, 1, 0, 0], 1.0, None).unwrap();
        assert!(!line_of_sight(&blocked, IVec3::ZERO, IVec3::new(0, 3, 0), 0.2));
        assert!(!line_of_sight(&blocked, IVec3::new(0, 3, 0), IVec3::ZERO, 0.2));
    }

    #[test]
    fn test_step_longer_than_ray() {
        let env = line(&[0, 1, 0]);
        assert!(line_of_sight(&env, IVec3::ZERO, IVec3::new(2, 0, 0), 5.0));
    }

    #[test]
    fn test_coincident_voxels() {
        let env = line(&[0, 0]);
        assert!(!line_of_sight(&env, IVec3::ZERO, IVec3::ZERO, 0.2));
    }

    #[test]
    fn test_diagonal_obstacle() {
        let shape = crate::voxel::GridShape::new(3, 3, 1).unwrap();
        let mut occupancy = vec![0u8; 9];
        let centre = shape.linear_index(IVec3::new(1, 1, 0)).unwrap();
        occupancy[centre] = 1;
        let env = VoxelEnvironment::new(shape, &occupancy, 1.0, None).unwrap();

        assert!(!line_of_sight(&env, IVec3::ZERO, IVec3::new(2, 2, 0), 0.2));
        assert!(line_of_sight(&env, IVec3::ZERO, IVec3::new(2, 0, 0), 0.2));

        occupancy[centre] = 0;
        let cleared = VoxelEnvironment::new(shape, &occupancy, 1.0, None).unwrap();
        assert!(line_of_sight(&cleared, IVec3::ZERO, IVec3::new(2, 2, 0), 0.2));
    }
}
