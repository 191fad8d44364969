/*!
Core collision types and math aliases shared by the collision submodules.

This module contains no algorithms. It defines the data exchanged between:
- broad (triangle AABBs and the BVH over them)
- narrow_phase (parry capsule/triangle contact queries)
- spatial_index (build + deepest-contact query)
- the movement integrator, which rebuilds a [`PlayerCapsule`] every frame
*/

use nalgebra as na;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Point3 = na::Point3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;

/// Vertical capsule approximating the player's body.
///
/// `start` is the center of the bottom sphere, `end` the center of the top sphere.
/// The swept volume reaches `radius` below `start` and above `end`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerCapsule {
    pub start: Point3,
    pub end: Point3,
    pub radius: f32,
}

impl PlayerCapsule {
    /// Capsule hanging below a camera at `eye`:
    /// `start.y = eye.y - eye_height`, `end.y = start.y + height`.
    #[inline]
    pub fn from_eye(eye: Vec3, eye_height: f32, height: f32, radius: f32) -> Self {
        let start = Point3::new(eye.x, eye.y - eye_height, eye.z);
        let end = Point3::new(eye.x, start.y + height, eye.z);
        Self { start, end, radius }
    }

    /// Lowest point of the swept volume.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.start.y.min(self.end.y) - self.radius
    }
}

/// Penetration of the capsule into world geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    /// Unit direction that moves the capsule out of the surface.
    pub normal: Vec3,
    /// Distance to travel along `normal` to separate (always >= 0).
    pub depth: f32,
}

impl Contact {
    /// Minimum translation vector resolving this contact.
    #[inline]
    pub fn mtv(&self) -> Vec3 {
        self.normal * self.depth
    }
}

/// Two-state ground classification driven by the last collision resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GroundState {
    #[default]
    Airborne,
    Grounded,
}

impl GroundState {
    #[inline]
    pub fn is_grounded(self) -> bool {
        matches!(self, Self::Grounded)
    }
}
