//! Property-based tests for levelset evaluation.
//!
//! The dual-tree search is checked against the exhaustive oracle on random
//! triangle soups, and the box bounds against sampled point pairs.
//!
//! Run with: cargo test -p mesh-levelset -- proptest

use approx::relative_eq;
use mesh_levelset::oracle::brute_force_levelset;
use mesh_levelset::{
    Bvh, LevelsetConfig, Surface, box_box_sqr_distance, point_box_sqr_distance, surface_levelset,
};
use mesh_types::{Aabb, IndexedMesh, Point3, Vertex, unit_cube};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arb_point(range: f64) -> impl Strategy<Value = Point3<f64>> {
    prop::array::uniform3(-range..range).prop_map(|[x, y, z]| Point3::new(x, y, z))
}

/// Triangle soup: random vertices, faces with arbitrary (possibly repeated)
/// indices.
fn arb_soup(max_vertices: usize, max_faces: usize) -> impl Strategy<Value = IndexedMesh> {
    prop::collection::vec(arb_point(10.0), 3..=max_vertices).prop_flat_map(move |positions| {
        let n = positions.len() as u32;
        let vertices: Vec<Vertex> = positions.into_iter().map(Vertex::new).collect();
        prop::collection::vec(prop::array::uniform3(0..n), 1..=max_faces).prop_map(move |faces| {
            IndexedMesh::from_parts(vertices.clone(), faces)
        })
    })
}

fn arb_box() -> impl Strategy<Value = Aabb> {
    (arb_point(10.0), arb_point(10.0)).prop_map(|(a, b)| Aabb::new(a, b))
}

/// Point inside `aabb` at the given per-axis fractions.
fn lerp_in(aabb: &Aabb, t: [f64; 3]) -> Point3<f64> {
    let size = aabb.size();
    Point3::new(
        aabb.min.x + size.x * t[0],
        aabb.min.y + size.y * t[1],
        aabb.min.z + size.z * t[2],
    )
}

fn close(a: f64, b: f64) -> bool {
    relative_eq!(a, b, epsilon = 1e-9, max_relative = 1e-9)
}

// =============================================================================
// Property Tests: Equivalence with the oracle
// =============================================================================

proptest! {
    /// Unsigned distances and directions match exhaustive search.
    #[test]
    fn unsigned_matches_brute_force(
        mesh in arb_soup(24, 40),
        points in prop::collection::vec(arb_point(15.0), 1..60),
        leaf_size in 1usize..6,
    ) {
        let surface = Surface::from_mesh(&mesh).expect("indices in range");
        let query_tree = Bvh::from_points(&points, leaf_size);
        let surface_tree = Bvh::from_surface(&surface, leaf_size);
        let levelset = surface_levelset(
            &points,
            &query_tree,
            &surface,
            &surface_tree,
            &LevelsetConfig::unsigned(),
        )
        .expect("valid inputs");
        let expected = brute_force_levelset(&points, &surface);

        for (got, want) in levelset.records().iter().zip(&expected) {
            prop_assert!(got.triangle.is_some());
            prop_assert!(close(got.phi, want.phi), "phi {} vs {}", got.phi, want.phi);
            if want.phi > 1e-6 {
                for k in 0..3 {
                    prop_assert!((got.normal[k] - want.normal[k]).abs() < 1e-6);
                }
            }
        }
    }

    /// The reported triangle really is at the reported distance.
    #[test]
    fn reported_triangle_is_consistent(
        mesh in arb_soup(16, 24),
        points in prop::collection::vec(arb_point(15.0), 1..30),
    ) {
        let surface = Surface::from_mesh(&mesh).expect("indices in range");
        let query_tree = Bvh::from_points(&points, 4);
        let surface_tree = Bvh::from_surface(&surface, 4);
        let levelset = surface_levelset(
            &points,
            &query_tree,
            &surface,
            &surface_tree,
            &LevelsetConfig::unsigned().with_parallel(false),
        )
        .expect("valid inputs");

        for (x, rec) in points.iter().zip(levelset.records()) {
            let t = rec.triangle.expect("no cutoff");
            let direct = (x - surface.closest_point(t, x).point).norm();
            prop_assert!(close(rec.phi, direct));
            prop_assert!(close(rec.weights.sum(), 1.0));
        }
    }

    /// Leaf size changes the work done, never the answer.
    #[test]
    fn leaf_size_does_not_change_distances(
        mesh in arb_soup(16, 30),
        points in prop::collection::vec(arb_point(12.0), 1..40),
    ) {
        let surface = Surface::from_mesh(&mesh).expect("indices in range");
        let run = |leaf_size: usize| {
            let query_tree = Bvh::from_points(&points, leaf_size);
            let surface_tree = Bvh::from_surface(&surface, leaf_size);
            surface_levelset(
                &points,
                &query_tree,
                &surface,
                &surface_tree,
                &LevelsetConfig::unsigned(),
            )
            .expect("valid inputs")
            .distances()
        };
        for (a, b) in run(1).iter().zip(run(16)) {
            prop_assert!(close(*a, b));
        }
    }
}

// =============================================================================
// Property Tests: Cutoff
// =============================================================================

proptest! {
    /// Points are found exactly when something lies within the cutoff.
    #[test]
    fn cutoff_is_respected(
        mesh in arb_soup(16, 24),
        points in prop::collection::vec(arb_point(20.0), 1..40),
        max_distance in 0.5..8.0f64,
    ) {
        let surface = Surface::from_mesh(&mesh).expect("indices in range");
        let query_tree = Bvh::from_points(&points, 3);
        let surface_tree = Bvh::from_surface(&surface, 3);
        let config = LevelsetConfig::unsigned().with_max_distance(max_distance);
        let levelset = surface_levelset(&points, &query_tree, &surface, &surface_tree, &config)
            .expect("valid inputs");
        let expected = brute_force_levelset(&points, &surface);

        for (got, want) in levelset.records().iter().zip(&expected) {
            if got.triangle.is_some() {
                prop_assert!(got.phi < max_distance);
                prop_assert!(close(got.phi, want.phi));
            } else {
                prop_assert!(close(got.phi, max_distance));
                prop_assert!(got.normal.norm() == 0.0);
                prop_assert!(want.phi >= max_distance * (1.0 - 1e-9));
            }
        }
    }
}

// =============================================================================
// Property Tests: Signs on a closed surface
// =============================================================================

proptest! {
    /// On the unit cube, negative distance means strictly inside.
    #[test]
    fn cube_signs_match_containment(
        points in prop::collection::vec(
            prop::array::uniform3(-1.0..2.0f64).prop_map(|[x, y, z]| Point3::new(x, y, z)),
            1..50,
        ),
    ) {
        let surface = Surface::from_mesh(&unit_cube()).expect("valid cube");
        let expected = brute_force_levelset(&points, &surface);
        let query_tree = Bvh::from_points(&points, 4);
        let surface_tree = Bvh::from_surface(&surface, 2);
        let levelset = surface_levelset(
            &points,
            &query_tree,
            &surface,
            &surface_tree,
            &LevelsetConfig::default(),
        )
        .expect("valid inputs");

        for ((x, got), want) in points.iter().zip(levelset.records()).zip(&expected) {
            if want.phi < 1e-6 {
                continue;
            }
            let inside = x.iter().all(|&c| c > 0.0 && c < 1.0);
            prop_assert_eq!(got.phi < 0.0, inside, "point {:?} phi {}", x, got.phi);
            prop_assert!(close(got.phi.abs(), want.phi));
            prop_assert!((got.normal.norm() - 1.0).abs() < 1e-9);
        }
    }
}

// =============================================================================
// Property Tests: Bound admissibility
// =============================================================================

proptest! {
    /// The point-box bound never exceeds the distance to a point in the box.
    #[test]
    fn point_box_bound_is_admissible(
        aabb in arb_box(),
        x in arb_point(20.0),
        t in prop::array::uniform3(0.0..=1.0f64),
    ) {
        let inside = lerp_in(&aabb, t);
        let bound = point_box_sqr_distance(&x, &aabb);
        prop_assert!(bound >= 0.0);
        prop_assert!(bound <= (x - inside).norm_squared() * (1.0 + 1e-12) + 1e-12);
    }

    /// The box-box bound never exceeds the distance between contained points.
    #[test]
    fn box_box_bound_is_admissible(
        a in arb_box(),
        b in arb_box(),
        ta in prop::array::uniform3(0.0..=1.0f64),
        tb in prop::array::uniform3(0.0..=1.0f64),
    ) {
        let (pa, pb) = (lerp_in(&a, ta), lerp_in(&b, tb));
        let bound = box_box_sqr_distance(&a, &b);
        prop_assert!(bound >= 0.0);
        prop_assert!(bound <= (pa - pb).norm_squared() * (1.0 + 1e-12) + 1e-12);
        prop_assert!(close(bound, box_box_sqr_distance(&b, &a)));
    }
}
