//! Sign checks on a closed surface that is not convex.
//!
//! The unit cube with its top face pushed in towards a dent vertex. Around
//! the rim, neighboring face normals are more than 90 degrees apart, so a
//! sign taken from the closest face alone goes wrong there. Containment is
//! decided independently by the generalized winding number.

use std::f64::consts::PI;

use approx::assert_relative_eq;
use mesh_levelset::oracle::brute_force_levelset;
use mesh_levelset::{LevelsetConfig, Sidedness, Surface, SurfaceLevelset};
use mesh_types::{IndexedMesh, Point3, Vertex, unit_cube};

// =============================================================================
// Helpers
// =============================================================================

const DENT_FACE: [u32; 3] = [4, 5, 8];

/// Unit cube whose top face is four triangles meeting at `(0.5, 0.5, 0.4)`.
fn dented_cube() -> IndexedMesh {
    let cube = unit_cube();
    let mut vertices = cube.vertices.clone();
    vertices.push(Vertex::from_coords(0.5, 0.5, 0.4));

    // Drop the flat top, keep the other ten faces
    let mut faces: Vec<[u32; 3]> = cube
        .faces
        .iter()
        .copied()
        .filter(|f| !f.iter().all(|&i| (4..8).contains(&i)))
        .collect();
    faces.extend_from_slice(&[DENT_FACE, [5, 6, 8], [6, 7, 8], [7, 4, 8]]);

    IndexedMesh::from_parts(vertices, faces)
}

/// Generalized winding number of a closed mesh around `p`.
fn winding_number(mesh: &IndexedMesh, p: &Point3<f64>) -> f64 {
    let solid_angle: f64 = mesh
        .triangles()
        .map(|tri| {
            let (a, b, c) = (tri.v0 - p, tri.v1 - p, tri.v2 - p);
            let (la, lb, lc) = (a.norm(), b.norm(), c.norm());
            let num = a.dot(&b.cross(&c));
            let den = la * lb * lc + a.dot(&b) * lc + a.dot(&c) * lb + b.dot(&c) * la;
            2.0 * num.atan2(den)
        })
        .sum();
    solid_angle / (4.0 * PI)
}

/// Lattice around the cube whose coordinates never hit `0` or `1`.
fn lattice() -> Vec<Point3<f64>> {
    let coords: Vec<f64> = (0..21).map(|i| f64::from(i).mul_add(0.08, -0.3)).collect();
    let mut points = Vec::with_capacity(coords.len().pow(3));
    for &x in &coords {
        for &y in &coords {
            for &z in &coords {
                points.push(Point3::new(x, y, z));
            }
        }
    }
    points
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn signs_agree_with_winding_number() {
    let mesh = dented_cube();
    let levelset = SurfaceLevelset::new(&mesh, LevelsetConfig::default().with_leaf_size(2))
        .expect("valid mesh");
    let points = lattice();
    let result = levelset.evaluate(&points).expect("valid query");
    let unsigned = brute_force_levelset(&points, levelset.surface());

    let mut in_dent = 0;
    for ((p, rec), reference) in points.iter().zip(result.records()).zip(&unsigned) {
        assert_relative_eq!(rec.phi.abs(), reference.phi, epsilon = 1e-9);
        if rec.phi.abs() <= 1e-9 {
            continue;
        }
        let inside = winding_number(&mesh, p) > 0.5;
        assert_eq!(rec.phi < 0.0, inside, "wrong sign at {p:?}, phi {}", rec.phi);

        if !inside && mesh.bounds().contains(p) {
            in_dent += 1;
        }
    }
    // Outside the solid but inside its bounding box
    assert!(in_dent > 0);
}

#[test]
fn rim_edge_uses_edge_normal() {
    let mesh = dented_cube();
    let surface = Surface::from_mesh(&mesh).expect("valid mesh");
    let t = mesh
        .faces
        .iter()
        .position(|f| *f == DENT_FACE)
        .expect("dent face present");

    // Just outside the rim edge from (0, 0, 1) to (1, 0, 1)
    let p = Point3::new(0.5, -0.06, 1.06);
    let close = surface.closest_point(t, &p);
    assert_relative_eq!(close.weights.z, 0.0);
    assert_relative_eq!(close.point, Point3::new(0.5, 0.0, 1.0), epsilon = 1e-12);

    // The dent face alone would put the point inside
    assert!((p - close.point).dot(&surface.face_normal(t)) < 0.0);
    assert_eq!(
        surface.inside_given_closest_point(&p, t, &close.weights),
        Sidedness::Outside
    );
}

#[test]
fn point_above_dent_is_outside() {
    let levelset =
        SurfaceLevelset::new(&dented_cube(), LevelsetConfig::default()).expect("valid mesh");
    let rec = levelset
        .closest(Point3::new(0.5, 0.5, 0.9))
        .expect("valid query");
    assert!(rec.phi > 0.0);

    let rec = levelset
        .closest(Point3::new(0.5, 0.5, 0.15))
        .expect("valid query");
    assert_relative_eq!(rec.phi, -0.15, epsilon = 1e-12);
}
