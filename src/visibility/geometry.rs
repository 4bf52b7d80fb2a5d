//! Angle-of-view and depth-of-field tests for a single camera/target pair.
//!
//! Offsets are in voxel units with `x` = width, `y` = height, `z` = depth.
//! Pan is measured in the x/z plane, tilt against that plane.

use std::f64::consts::PI;

use glam::DVec3;

use crate::camera::{Dof, SingleCamera};

/// Direction from a camera to a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleOfView {
    /// Horizontal angle in radians; `None` for a purely vertical offset,
    /// where it is undefined.
    pub horizontal: Option<f64>,
    /// Vertical angle in radians.
    pub vertical: f64,
}

/// Angle of view of the offset `diff` from camera to target.
///
/// Returns `None` for a zero offset.
pub fn angle_of_view(diff: DVec3) -> Option<AngleOfView> {
    let length = diff.length();
    if length == 0.0 || !length.is_finite() {
        return None;
    }

    let planar = (diff.x * diff.x + diff.z * diff.z).sqrt();
    let horizontal = if planar == 0.0 {
        None
    } else {
        let mut horizontal = (diff.x / planar).clamp(-1.0, 1.0).asin();
        if diff.x > 0.0 && diff.z < 0.0 {
            horizontal = PI - horizontal;
        }
        if diff.x < 0.0 && diff.z > 0.0 {
            horizontal = -PI - horizontal;
        }
        Some(horizontal)
    };
    let vertical = (diff.y / length).clamp(-1.0, 1.0).asin();

    Some(AngleOfView {
        horizontal,
        vertical,
    })
}

/// Whether an angle of view falls inside the camera's FOV cone.
pub fn in_field_of_view(aov: &AngleOfView, camera: &SingleCamera) -> bool {
    let direction = camera.direction();

    if let Some(horizontal) = aov.horizontal {
        if (horizontal - direction.pan).abs() > camera.horizontal_angle() / 2.0 {
            return false;
        }
    }

    (aov.vertical - direction.tilt).abs() <= camera.vertical_angle() / 2.0
}

/// Whether the physical distance of `diff` lies inside `dof`.
pub fn in_depth_of_field(diff: DVec3, voxel_len: f64, dof: Dof) -> bool {
    dof.contains(diff.length() * voxel_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{CameraParams, Direction, ResolutionRange};
    use crate::diagnostics::Diagnostics;
    use std::f64::consts::FRAC_PI_2;

    fn camera(pan: f64, tilt: f64, clip: f64, focal: f64) -> SingleCamera {
        let params = CameraParams {
            direction: Direction::new(pan, tilt),
            clip_shape: [clip, clip],
            focal_len: focal,
            resolution: [1000.0, 1000.0],
            horizontal_resol: ResolutionRange::new(100.0, 1000.0),
            vertical_resol: ResolutionRange::new(100.0, 1000.0),
            cost: 1.0,
        };
        SingleCamera::new(&params, 0, &Diagnostics::new())
    }

    #[test]
    fn test_angle_along_axes() {
        let aov = angle_of_view(DVec3::new(1.0, 0.0, 0.0)).unwrap();
        assert!((aov.horizontal.unwrap() - FRAC_PI_2).abs() < 1e-12);
        assert_eq!(aov.vertical, 0.0);

        let aov = angle_of_view(DVec3::new(0.0, 0.0, 2.0)).unwrap();
        assert_eq!(aov.horizontal, Some(0.0));

        let aov = angle_of_view(DVec3::new(-3.0, 0.0, 0.0)).unwrap();
        assert!((aov.horizontal.unwrap() + FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_angle_quadrant_correction() {
        // x > 0, z < 0: behind and to the right
        let aov = angle_of_view(DVec3::new(1.0, 0.0, -1.0)).unwrap();
        assert!((aov.horizontal.unwrap() - 3.0 * PI / 4.0).abs() < 1e-12);

        // x < 0, z > 0: in front and to the left
        let aov = angle_of_view(DVec3::new(-1.0, 0.0, 1.0)).unwrap();
        assert!((aov.horizontal.unwrap() + 3.0 * PI / 4.0).abs() < 1e-12);

        // x > 0, z > 0 is left untouched
        let aov = angle_of_view(DVec3::new(1.0, 0.0, 1.0)).unwrap();
        assert!((aov.horizontal.unwrap() - PI / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_vertical_angle() {
        let aov = angle_of_view(DVec3::new(1.0, 1.0, 0.0)).unwrap();
        assert!((aov.vertical - PI / 4.0).abs() < 1e-12);

        let aov = angle_of_view(DVec3::new(0.0, -2.0, 0.0)).unwrap();
        assert_eq!(aov.horizontal, None);
        assert!((aov.vertical + FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_zero_offset_has_no_angle() {
        assert_eq!(angle_of_view(DVec3::ZERO), None);
    }

    #[test]
    fn test_field_of_view_containment() {
        // 90 degree cone (clip == focal * 2) looking along +x
        let cam = camera(FRAC_PI_2, 0.0, 2.0, 1.0);
        assert!((cam.horizontal_angle() - FRAC_PI_2).abs() < 1e-12);

        let ahead = angle_of_view(DVec3::new(4.0, 0.0, 0.0)).unwrap();
        assert!(in_field_of_view(&ahead, &cam));

        let edge = angle_of_view(DVec3::new(4.0, 0.0, 3.9)).unwrap();
        assert!(in_field_of_view(&edge, &cam));

        let outside = angle_of_view(DVec3::new(1.0, 0.0, 3.0)).unwrap();
        assert!(!in_field_of_view(&outside, &cam));

        let too_high = angle_of_view(DVec3::new(1.0, 3.0, 0.0)).unwrap();
        assert!(!in_field_of_view(&too_high, &cam));

        let behind = angle_of_view(DVec3::new(-4.0, 0.0, 0.0)).unwrap();
        assert!(!in_field_of_view(&behind, &cam));
    }

    #[test]
    fn test_vertical_ray_only_checks_tilt() {
        let looking_up = camera(0.0, FRAC_PI_2, 2.0, 1.0);
        let looking_flat = camera(0.0, 0.0, 2.0, 1.0);
        let above = angle_of_view(DVec3::new(0.0, 5.0, 0.0)).unwrap();

        assert!(in_field_of_view(&above, &looking_up));
        assert!(!in_field_of_view(&above, &looking_flat));
    }

    #[test]
    fn test_depth_of_field_uses_voxel_len() {
        let dof = Dof::new(1.0, 3.0);
        let diff = DVec3::new(4.0, 0.0, 0.0);

        assert!(!in_depth_of_field(diff, 1.0, dof));
        assert!(in_depth_of_field(diff, 0.5, dof));
        assert!(in_depth_of_field(diff, 0.25, dof));
        assert!(!in_depth_of_field(diff, 0.2, dof));
    }
}
