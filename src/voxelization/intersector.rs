//! Ray/mesh intersection.
//!
//! The engine only needs nearest-hit queries against one mesh at a time. The
//! default [`BvhIntersector`] builds a QBVH-backed `parry3d_f64` triangle mesh
//! per input mesh; anything else implementing [`Intersector`] can be plugged in
//! through [`voxelize_with`](super::engine::voxelize_with).

use super::{Result, VoxelizeError};
use crate::math::{barycentric, Vector3};
use crate::mesh::TriangleMesh;
use parry3d_f64::na::{Point3, Vector3 as NaVector3};
use parry3d_f64::query::{Ray, RayCast};
use parry3d_f64::shape::{FeatureId, TriMesh};

/// Relative widening of the cast range handed to parry.
const RANGE_SLACK: f64 = 1e-9;

/// Nearest surface hit along a ray.
#[derive(Debug, Clone, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin (direction is unit length).
    pub distance: f64,
    /// World-space hit point.
    pub point: Vector3,
    /// Index of the hit triangle in the mesh index buffer.
    pub triangle: Option<usize>,
    /// Vertex indices of the hit triangle.
    pub face: Option<[u32; 3]>,
    /// Interpolated UV0 at the hit point.
    pub uv: Option<[f64; 2]>,
    /// Material slot of the hit triangle.
    pub material_index: Option<usize>,
}

/// Nearest-hit ray casting against the meshes of one conversion.
///
/// `mesh` indexes the mesh slice the intersector was prepared for. Hits
/// farther than `max_distance` are not reported; a hit exactly at
/// `max_distance` is.
pub trait Intersector: Sync {
    fn mesh_count(&self) -> usize;

    fn cast_ray(
        &self,
        mesh: usize,
        origin: &Vector3,
        direction: &Vector3,
        max_distance: f64,
    ) -> Result<Option<RayHit>>;
}

struct PreparedMesh<'a> {
    source: &'a TriangleMesh,
    shape: TriMesh,
}

/// Intersector backed by one parry `TriMesh` (and its QBVH) per mesh.
pub struct BvhIntersector<'a> {
    meshes: Vec<PreparedMesh<'a>>,
}

impl<'a> BvhIntersector<'a> {
    /// Build acceleration structures for every mesh.
    ///
    /// Meshes are expected to carry geometry; one that doesn't is an error.
    pub fn build<M>(meshes: M) -> Result<Self>
    where
        M: IntoIterator<Item = &'a TriangleMesh>,
    {
        let prepared = meshes
            .into_iter()
            .enumerate()
            .map(|(i, mesh)| {
                let vertices: Vec<Point3<f64>> = mesh
                    .positions
                    .iter()
                    .map(|p| Point3::new(p.x, p.y, p.z))
                    .collect();
                let shape = TriMesh::new(vertices, mesh.indices.clone()).map_err(|e| {
                    VoxelizeError::Intersector(format!("mesh {} ({}): {}", i, mesh.name, e))
                })?;
                Ok(PreparedMesh {
                    source: mesh,
                    shape,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { meshes: prepared })
    }
}

impl Intersector for BvhIntersector<'_> {
    fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    fn cast_ray(
        &self,
        mesh: usize,
        origin: &Vector3,
        direction: &Vector3,
        max_distance: f64,
    ) -> Result<Option<RayHit>> {
        let prepared = self.meshes.get(mesh).ok_or_else(|| {
            VoxelizeError::Intersector(format!(
                "mesh index {} out of range ({} meshes)",
                mesh,
                self.meshes.len()
            ))
        })?;

        let ray = Ray::new(
            Point3::new(origin.x, origin.y, origin.z),
            NaVector3::new(direction.x, direction.y, direction.z),
        );
        // parry's time-of-impact bound is exclusive.
        let reach = max_distance * (1.0 + RANGE_SLACK);
        let Some(hit) = prepared
            .shape
            .cast_local_ray_and_get_normal(&ray, reach, false)
            .filter(|hit| hit.time_of_impact <= max_distance)
        else {
            return Ok(None);
        };

        let point = *origin + *direction * hit.time_of_impact;
        let source = prepared.source;

        // Back-face hits are reported past the end of the index buffer.
        let triangle = match hit.feature {
            FeatureId::Face(id) if !source.indices.is_empty() => {
                Some(id as usize % source.indices.len())
            }
            _ => None,
        };

        let face = triangle.and_then(|t| source.indices.get(t).copied());
        let uv = face.and_then(|f| interpolate_uv(source, f, &point));
        let material_index = triangle.and_then(|t| {
            source
                .material_indices
                .as_ref()
                .and_then(|m| m.get(t).copied())
        });

        Ok(Some(RayHit {
            distance: hit.time_of_impact,
            point,
            triangle,
            face,
            uv,
            material_index,
        }))
    }
}

fn interpolate_uv(mesh: &TriangleMesh, face: [u32; 3], point: &Vector3) -> Option<[f64; 2]> {
    let uvs = mesh.uvs.as_ref()?;
    let corner = |i: u32| mesh.positions.get(i as usize).copied();
    let uv = |i: u32| uvs.get(i as usize).copied();

    let (a, b, c) = (corner(face[0])?, corner(face[1])?, corner(face[2])?);
    let (ta, tb, tc) = (uv(face[0])?, uv(face[1])?, uv(face[2])?);

    let Some(w) = barycentric(point, &a, &b, &c) else {
        return Some(ta);
    };
    Some([
        ta[0] * w[0] + tb[0] * w[1] + tc[0] * w[2],
        ta[1] * w[0] + tb[1] * w[1] + tc[1] * w[2],
    ])
}
