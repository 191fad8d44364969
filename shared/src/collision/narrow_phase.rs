use rapier3d::parry::{query, shape as pshape};

use super::types::{Contact, Iso, PlayerCapsule, Point3, Vec3};

/// Penetration of a capsule into a single triangle, if any.
///
/// Both shapes are expressed directly in world space (identity poses). The
/// returned normal points from the triangle toward the capsule so that moving
/// the capsule by `normal * depth` separates them. Touching without overlap
/// (`dist == 0`) is not reported.
pub fn capsule_triangle_contact(capsule: &PlayerCapsule, tri: &[Point3; 3]) -> Option<Contact> {
    let capsule_shape = pshape::Capsule::new(capsule.start, capsule.end, capsule.radius);
    let triangle = pshape::Triangle::new(tri[0], tri[1], tri[2]);
    let identity = Iso::identity();

    let contact = match query::contact(&identity, &capsule_shape, &identity, &triangle, 0.0) {
        Ok(Some(contact)) => contact,
        Ok(None) => return None,
        Err(unsupported) => {
            log::warn!("capsule/triangle contact unsupported: {unsupported:?}");
            return None;
        }
    };

    if contact.dist >= 0.0 {
        return None;
    }

    // normal1 is the outward normal on the capsule, pointing at the triangle.
    let n1 = contact.normal1.into_inner();
    let normal = Vec3::new(-n1.x, -n1.y, -n1.z);
    if !normal.iter().all(|c| c.is_finite()) {
        return None;
    }

    Some(Contact {
        normal,
        depth: -contact.dist,
    })
}

/// Deepest contact among `candidates`, ties broken by the lowest triangle index.
pub fn deepest_contact(
    capsule: &PlayerCapsule,
    triangles: &[[Point3; 3]],
    candidates: &[usize],
) -> Option<Contact> {
    let mut best: Option<Contact> = None;
    for &idx in candidates {
        if let Some(hit) = capsule_triangle_contact(capsule, &triangles[idx]) {
            if best.map_or(true, |b| hit.depth > b.depth) {
                best = Some(hit);
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn floor_triangle() -> [Point3; 3] {
        [
            Point3::new(-10.0, 0.0, -10.0),
            Point3::new(10.0, 0.0, -10.0),
            Point3::new(0.0, 0.0, 10.0),
        ]
    }

    fn capsule_at(bottom_sphere_y: f32) -> PlayerCapsule {
        PlayerCapsule {
            start: Point3::new(0.0, bottom_sphere_y, 0.0),
            end: Point3::new(0.0, bottom_sphere_y + 1.0, 0.0),
            radius: 0.5,
        }
    }

    #[test]
    fn overlapping_floor_pushes_up() {
        let hit = capsule_triangle_contact(&capsule_at(0.3), &floor_triangle()).expect("hit");
        assert_abs_diff_eq!(hit.normal, Vec3::y(), epsilon = 1.0e-3);
        assert_abs_diff_eq!(hit.depth, 0.2, epsilon = 1.0e-3);
    }

    #[test]
    fn separated_capsule_has_no_contact() {
        assert!(capsule_triangle_contact(&capsule_at(1.0), &floor_triangle()).is_none());
    }

    #[test]
    fn deepest_candidate_wins() {
        let shallow = floor_triangle();
        let deep = [
            Point3::new(-10.0, 0.2, -10.0),
            Point3::new(10.0, 0.2, -10.0),
            Point3::new(0.0, 0.2, 10.0),
        ];
        let triangles = [shallow, deep];
        let hit = deepest_contact(&capsule_at(0.3), &triangles, &[0, 1]).expect("hit");
        assert_abs_diff_eq!(hit.depth, 0.4, epsilon = 1.0e-3);
    }
}
