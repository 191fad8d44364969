//! Static acceleration structure over the collidable world.
//!
//! Build once from [`WorldGeometry`], then answer capsule intersection queries.
//! There is no incremental update: a geometry change requires a full rebuild.

use rapier3d::parry::bounding_volume::{Aabb, BoundingVolume};

use super::{
    broad::{self, TriangleAccel},
    narrow_phase,
    types::{Contact, PlayerCapsule, Point3},
};
use crate::geometry::{GeometryError, MeshSource, WorldGeometry};

pub struct SpatialIndex {
    triangles: Vec<[Point3; 3]>,
    accel: TriangleAccel,
    bounds: Option<Aabb>,
}

impl SpatialIndex {
    /// Build the index, taking ownership of the geometry.
    pub fn build(geometry: WorldGeometry) -> Self {
        let triangles: Vec<[Point3; 3]> = geometry.triangles().collect();
        let accel = broad::build_triangle_accel(&triangles);
        let bounds = triangles
            .iter()
            .map(broad::triangle_aabb)
            .reduce(|a, b| a.merged(&b));

        match &bounds {
            Some(b) => log::info!(
                "spatial index built: {} triangles, bounds {:?}..{:?}",
                triangles.len(),
                b.mins,
                b.maxs
            ),
            None => log::warn!("spatial index built from empty geometry; nothing is collidable"),
        }

        Self {
            triangles,
            accel,
            bounds,
        }
    }

    /// Validate the provider's meshes and build in one step.
    pub fn from_meshes(meshes: &[MeshSource]) -> Result<Self, GeometryError> {
        WorldGeometry::from_meshes(meshes).map(Self::build)
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// World-space bounds of all triangles, `None` when empty.
    #[inline]
    pub fn bounds(&self) -> Option<&Aabb> {
        self.bounds.as_ref()
    }

    /// Deepest penetration of `capsule` into the world, if it overlaps anything.
    ///
    /// Only one contact is reported per query; overlapping several surfaces
    /// resolves the deepest one (lowest triangle index on ties).
    pub fn intersect(&self, capsule: &PlayerCapsule) -> Option<Contact> {
        let query = broad::capsule_aabb(capsule);
        let candidates = broad::query_candidates(&self.accel, &query);
        let hit = narrow_phase::deepest_contact(capsule, &self.triangles, &candidates);
        if let Some(contact) = &hit {
            log::trace!(
                "capsule contact: normal {:?} depth {} ({} candidates)",
                contact.normal,
                contact.depth,
                candidates.len()
            );
        }
        hit
    }
}
