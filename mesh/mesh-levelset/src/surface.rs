//! Triangle surface with the data needed for closest-point sign tests.
//!
//! Inside/outside classification uses angle-weighted pseudo-normals
//! (Bærentzen & Aanæs): the closest feature of a closed, consistently
//! oriented surface is a face, an edge or a vertex, and the sign of the
//! displacement against that feature's pseudo-normal decides the side.

use std::f64::consts::PI;

use hashbrown::HashMap;
use mesh_types::{Aabb, ClosestPoint, IndexedMesh, Point3, Triangle, Vector3};

use crate::error::{LevelsetError, LevelsetResult};

/// Outcome of an inside/outside test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sidedness {
    /// The point is enclosed by the surface.
    Inside,
    /// The point is outside the surface.
    Outside,
    /// The configuration is degenerate: the point lies on the surface, or
    /// the closest feature has no usable orientation.
    Indeterminate,
}

/// An immutable triangle surface.
///
/// Triangle `t` is face `t` of the mesh it was built from. Each triangle
/// carries its vertex positions and a unit face normal (zero when the
/// triangle has no area).
#[derive(Debug, Clone, Default)]
pub struct Surface {
    faces: Vec<[u32; 3]>,
    triangles: Vec<Triangle>,
    normals: Vec<Vector3<f64>>,
    vertex_normals: Vec<Vector3<f64>>,
    edge_normals: HashMap<(u32, u32), Vector3<f64>>,
}

impl Surface {
    /// Build a surface from an indexed mesh.
    ///
    /// # Errors
    ///
    /// Returns [`LevelsetError::InvalidFace`] if a face references a vertex
    /// outside the mesh.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_levelset::Surface;
    /// use mesh_types::unit_cube;
    ///
    /// let surface = Surface::from_mesh(&unit_cube()).unwrap();
    /// assert_eq!(surface.len(), 12);
    /// ```
    pub fn from_mesh(mesh: &IndexedMesh) -> LevelsetResult<Self> {
        let vertex_count = mesh.vertices.len();
        let mut triangles = Vec::with_capacity(mesh.faces.len());
        for (face_idx, face) in mesh.faces.iter().enumerate() {
            if let Some(&vertex) = face.iter().find(|&&v| v as usize >= vertex_count) {
                return Err(LevelsetError::InvalidFace {
                    face: face_idx,
                    vertex,
                });
            }
            let [a, b, c] = face.map(|v| mesh.vertices[v as usize].position);
            triangles.push(Triangle::new(a, b, c));
        }

        let normals: Vec<Vector3<f64>> = triangles
            .iter()
            .map(|t| t.normal().unwrap_or_else(Vector3::zeros))
            .collect();

        let mut vertex_normals = vec![Vector3::zeros(); vertex_count];
        let mut edge_normals: HashMap<(u32, u32), Vector3<f64>> =
            HashMap::with_capacity(mesh.faces.len() * 3 / 2);

        for ((face, tri), normal) in mesh.faces.iter().zip(&triangles).zip(&normals) {
            let corners = tri.vertices();
            for i in 0..3 {
                let (j, k) = ((i + 1) % 3, (i + 2) % 3);
                let angle = corner_angle(&corners[i], &corners[j], &corners[k]);
                vertex_normals[face[i] as usize] += normal * angle;
                *edge_normals
                    .entry(edge_key(face[i], face[j]))
                    .or_insert_with(Vector3::zeros) += normal;
            }
        }

        Ok(Self {
            faces: mesh.faces.clone(),
            triangles,
            normals,
            vertex_normals,
            edge_normals,
        })
    }

    /// Number of triangles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Check if the surface has no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// All triangles in id order.
    #[must_use]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Triangle `t`.
    #[must_use]
    pub fn triangle(&self, t: usize) -> &Triangle {
        &self.triangles[t]
    }

    /// Unit face normal of triangle `t`.
    #[must_use]
    pub fn face_normal(&self, t: usize) -> Vector3<f64> {
        self.normals[t]
    }

    /// Bounding box of every triangle.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        self.triangles
            .iter()
            .fold(Aabb::empty(), |acc, t| acc.union(&t.bounds()))
    }

    /// Closest point on triangle `t` to `point`.
    #[must_use]
    pub fn closest_point(&self, t: usize, point: &Point3<f64>) -> ClosestPoint {
        self.triangles[t].closest_point(point)
    }

    /// Decide whether `point` is inside the surface, given that the closest
    /// surface point lies on triangle `t` at barycentric `weights`.
    ///
    /// Zero weights select the closest feature: two zeros mean a vertex,
    /// one zero means an edge, otherwise the face interior.
    #[must_use]
    pub fn inside_given_closest_point(
        &self,
        point: &Point3<f64>,
        t: usize,
        weights: &Vector3<f64>,
    ) -> Sidedness {
        let tri = &self.triangles[t];
        let closest = Point3::from(
            tri.v0.coords * weights.x + tri.v1.coords * weights.y + tri.v2.coords * weights.z,
        );
        let side = (point - closest).dot(&self.pseudo_normal(t, weights));

        if side < 0.0 {
            Sidedness::Inside
        } else if side > 0.0 {
            Sidedness::Outside
        } else {
            Sidedness::Indeterminate
        }
    }

    // Exact zeros come from the region walk in `Triangle::closest_point`.
    #[allow(clippy::float_cmp)]
    fn pseudo_normal(&self, t: usize, weights: &Vector3<f64>) -> Vector3<f64> {
        let face = self.faces[t];
        let zero = [weights.x == 0.0, weights.y == 0.0, weights.z == 0.0];
        match zero {
            [false, true, true] => self.vertex_normals[face[0] as usize],
            [true, false, true] => self.vertex_normals[face[1] as usize],
            [true, true, false] => self.vertex_normals[face[2] as usize],
            [true, false, false] => self.edge_normal(face[1], face[2]),
            [false, true, false] => self.edge_normal(face[2], face[0]),
            [false, false, true] => self.edge_normal(face[0], face[1]),
            _ => self.normals[t],
        }
    }

    fn edge_normal(&self, a: u32, b: u32) -> Vector3<f64> {
        self.edge_normals
            .get(&edge_key(a, b))
            .copied()
            .unwrap_or_else(Vector3::zeros)
    }
}

fn edge_key(a: u32, b: u32) -> (u32, u32) {
    if a < b { (a, b) } else { (b, a) }
}

/// Interior angle at `at` between the edges to `p` and `q`.
fn corner_angle(at: &Point3<f64>, p: &Point3<f64>, q: &Point3<f64>) -> f64 {
    let (u, v) = (p - at, q - at);
    if u.norm_squared() == 0.0 || v.norm_squared() == 0.0 {
        return 0.0;
    }
    u.angle(&v).clamp(0.0, PI)
}
