//! Collidable world geometry handed over by the scene loader.
//!
//! The loader supplies one [`MeshSource`] per collidable mesh; [`WorldGeometry`]
//! flattens them into a single world-space triangle soup that the spatial index
//! takes ownership of.

use nalgebra as na;
use thiserror::Error;

use crate::collision::Point3;

/// One collidable mesh as provided by the asset layer.
#[derive(Clone, Debug)]
pub struct MeshSource {
    /// Mesh-local vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Flat triangle list; length must be a multiple of 3.
    pub indices: Vec<u32>,
    /// Affine local-to-world transform.
    pub transform: na::Matrix4<f32>,
}

impl MeshSource {
    /// Mesh already expressed in world space.
    pub fn world_space(positions: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            indices,
            transform: na::Matrix4::identity(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    #[error("mesh {mesh}: index count {count} is not a multiple of 3")]
    IncompleteTriangle { mesh: usize, count: usize },
    #[error("mesh {mesh}: index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        mesh: usize,
        index: u32,
        vertex_count: usize,
    },
}

/// Immutable world-space triangle soup.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorldGeometry {
    vertices: Vec<Point3>,
    triangles: Vec<[u32; 3]>,
}

impl WorldGeometry {
    /// Merge and transform every mesh into world space.
    ///
    /// Non-finite and zero-area triangles are skipped; malformed index data is an error.
    pub fn from_meshes(meshes: &[MeshSource]) -> Result<Self, GeometryError> {
        let mut vertices: Vec<Point3> = Vec::new();
        let mut triangles: Vec<[u32; 3]> = Vec::new();
        let mut skipped = 0usize;

        for (mesh_idx, mesh) in meshes.iter().enumerate() {
            if mesh.indices.len() % 3 != 0 {
                return Err(GeometryError::IncompleteTriangle {
                    mesh: mesh_idx,
                    count: mesh.indices.len(),
                });
            }
            if let Some(&index) = mesh
                .indices
                .iter()
                .find(|&&i| i as usize >= mesh.positions.len())
            {
                return Err(GeometryError::IndexOutOfRange {
                    mesh: mesh_idx,
                    index,
                    vertex_count: mesh.positions.len(),
                });
            }

            let base = vertices.len() as u32;
            vertices.extend(mesh.positions.iter().map(|p| {
                mesh.transform
                    .transform_point(&Point3::new(p[0], p[1], p[2]))
            }));

            for tri in mesh.indices.chunks_exact(3) {
                let corners = [tri[0] + base, tri[1] + base, tri[2] + base];
                if is_usable(&vertices, corners) {
                    triangles.push(corners);
                } else {
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            log::warn!("skipped {skipped} degenerate or non-finite collision triangles");
        }

        Ok(Self {
            vertices,
            triangles,
        })
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// World-space corners of every triangle, in input order.
    pub fn triangles(&self) -> impl Iterator<Item = [Point3; 3]> + '_ {
        self.triangles.iter().map(|&[a, b, c]| {
            [
                self.vertices[a as usize],
                self.vertices[b as usize],
                self.vertices[c as usize],
            ]
        })
    }
}

fn is_usable(vertices: &[Point3], [a, b, c]: [u32; 3]) -> bool {
    let (a, b, c) = (
        vertices[a as usize],
        vertices[b as usize],
        vertices[c as usize],
    );
    if ![a, b, c].iter().all(|p| p.iter().all(|v| v.is_finite())) {
        return false;
    }
    (b - a).cross(&(c - a)).norm_squared() > 1.0e-12
}
