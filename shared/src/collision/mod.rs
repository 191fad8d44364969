/*!
Collision root module.

Capsule-vs-static-mesh collision for the first-person controller, using parry
(through rapier3d) for narrow-phase queries and a BVH over triangle AABBs for
the broad phase:

- types:         shared data types (PlayerCapsule, Contact, GroundState, math aliases)
- broad:         triangle/capsule AABBs and BVH candidate queries
- narrow_phase:  capsule/triangle penetration via parry contact queries
- spatial_index: build-once index answering deepest-contact queries
*/

pub mod broad;
pub mod narrow_phase;
pub mod spatial_index;
pub mod types;

// Re-export commonly used types.
pub use spatial_index::SpatialIndex;
pub use types::{Contact, GroundState, Iso, PlayerCapsule, Point3, Quat, Vec3};

/// Query an optional index. A missing index means "no collision" so the
/// simulation never blocks on asynchronous world loading.
#[inline]
pub fn intersect_or_none(index: Option<&SpatialIndex>, capsule: &PlayerCapsule) -> Option<Contact> {
    index.and_then(|index| index.intersect(capsule))
}
