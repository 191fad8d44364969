use std::f32::consts::FRAC_PI_2;

use nalgebra as na;

use crate::collision::{Quat, Vec3};

/// Camera look direction. Roll is always zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Orientation {
    /// Rotation about +X in radians, clamped to [-π/2, π/2].
    pub pitch: f32,
    /// Rotation about +Y in radians, unbounded.
    pub yaw: f32,
}

impl Orientation {
    pub fn new(pitch: f32, yaw: f32) -> Self {
        Self {
            pitch: pitch.clamp(-FRAC_PI_2, FRAC_PI_2),
            yaw,
        }
    }

    /// Apply one frame's drained mouse delta.
    pub fn apply_look(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        self.yaw -= dx * sensitivity;
        self.pitch -= dy * sensitivity;
        self.pitch = self.pitch.clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Yaw-then-pitch rotation (YXZ Euler order, zero roll).
    pub fn rotation(&self) -> Quat {
        Quat::from_axis_angle(&na::Vector3::y_axis(), self.yaw)
            * Quat::from_axis_angle(&na::Vector3::x_axis(), self.pitch)
    }

    /// Camera -Z rotated by the full orientation (pitch included).
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::new(0.0, 0.0, -1.0)
    }

    /// Camera +X rotated by the full orientation.
    #[inline]
    pub fn right(&self) -> Vec3 {
        self.rotation() * Vec3::new(1.0, 0.0, 0.0)
    }
}

/// The pose handed to the render boundary each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub orientation: Orientation,
}

impl CameraPose {
    pub fn new(position: Vec3, orientation: Orientation) -> Self {
        Self {
            position,
            orientation,
        }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|c| c.is_finite())
            && self.orientation.pitch.is_finite()
            && self.orientation.yaw.is_finite()
    }
}
