use nalgebra as na;
use rapier3d::parry::{
    bounding_volume::{Aabb, BoundingVolume},
    partitioning::{Bvh, BvhBuildStrategy},
};

use super::types::{PlayerCapsule, Point3};

/// Broad-phase accelerator over immutable world triangles.
///
/// Notes:
/// - Every triangle is stored as a world-space AABB leaf; leaf `i` is triangle `i`.
/// - The BVH is built once and never refit (static world only).
pub struct TriangleAccel {
    /// BVH over per-triangle AABBs.
    pub bvh: Bvh,
    /// Number of leaves in `bvh`.
    pub leaf_count: usize,
}

impl TriangleAccel {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.leaf_count == 0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.leaf_count
    }
}

/// Build the broad-phase accelerator from triangle corners.
pub fn build_triangle_accel(triangles: &[[Point3; 3]]) -> TriangleAccel {
    let aabbs: Vec<Aabb> = triangles.iter().map(triangle_aabb).collect();

    TriangleAccel {
        bvh: Bvh::from_leaves(BvhBuildStrategy::Binned, &aabbs),
        leaf_count: aabbs.len(),
    }
}

/// World-space AABB of one triangle.
pub fn triangle_aabb(tri: &[Point3; 3]) -> Aabb {
    let [a, b, c] = tri;
    let mins = na::Point3::new(
        a.x.min(b.x).min(c.x),
        a.y.min(b.y).min(c.y),
        a.z.min(b.z).min(c.z),
    );
    let maxs = na::Point3::new(
        a.x.max(b.x).max(c.x),
        a.y.max(b.y).max(c.y),
        a.z.max(b.z).max(c.z),
    );
    Aabb::new(mins, maxs)
}

/// AABB of the capsule's swept volume (segment inflated by `radius`).
pub fn capsule_aabb(capsule: &PlayerCapsule) -> Aabb {
    let segment = Aabb::new(
        na::Point3::new(
            capsule.start.x.min(capsule.end.x),
            capsule.start.y.min(capsule.end.y),
            capsule.start.z.min(capsule.end.z),
        ),
        na::Point3::new(
            capsule.start.x.max(capsule.end.x),
            capsule.start.y.max(capsule.end.y),
            capsule.start.z.max(capsule.end.z),
        ),
    );
    segment.loosened(capsule.radius)
}

/// Triangle indices whose AABB intersects `query`, in ascending order.
///
/// Sorting keeps narrow-phase tie-breaking independent of BVH traversal order.
pub fn query_candidates(accel: &TriangleAccel, query: &Aabb) -> Vec<usize> {
    if accel.is_empty() {
        return Vec::new();
    }
    let mut candidates: Vec<usize> = accel
        .bvh
        .intersect_aabb(query)
        .map(|leaf_idx| leaf_idx as usize)
        .collect();
    candidates.sort_unstable();
    candidates.dedup();
    candidates
}
