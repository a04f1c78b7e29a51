//! Dual-tree branch-and-bound closest-triangle search.
//!
//! The query hierarchy and the surface hierarchy are descended together.
//! For every query node we keep `sqr_phi_node`, the largest best squared
//! distance of any point below it. A surface subtree whose box lower bound
//! is not below that value cannot improve any of those points and is
//! skipped. Leaf pairs fall back to exact point-triangle projection.

use mesh_types::{Aabb, Point3};

use crate::bound::{box_box_sqr_distance, point_box_sqr_distance};
use crate::candidate::ClosestTriangle;
use crate::hierarchy::BoundingHierarchy;
use crate::surface::Surface;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Counters collected during an evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchStats {
    /// Leaf pairs evaluated.
    pub leaf_pairs: u64,
    /// Exact point-triangle projections performed.
    pub triangle_tests: u64,
    /// Surface subtrees skipped by the node bound.
    pub pruned_surface_nodes: u64,
    /// Query subtrees skipped by their own bound.
    pub pruned_query_nodes: u64,
    /// Points skipped inside leaf pairs by the point bound.
    pub pruned_points: u64,
    /// Points whose sign test was indeterminate during finalization.
    pub degenerate_signs: u64,
}

impl SearchStats {
    /// Fraction of the brute-force `points * triangles` projections that
    /// were actually performed.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn evaluation_ratio(&self, points: usize, triangles: usize) -> f64 {
        if points == 0 || triangles == 0 {
            return 0.0;
        }
        self.triangle_tests as f64 / (points as f64 * triangles as f64)
    }
}

/// What to do with a pair of nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Both nodes are leaves: compare their primitives exhaustively.
    LeafPair,
    /// Descend into the surface node's children, nearest first.
    SplitSurface([usize; 2]),
    /// Descend into the query node's children.
    SplitQuery([usize; 2]),
}

/// Choose how to narrow a (query, surface) node pair.
///
/// When both nodes are internal the one with the larger box is split, so
/// the two descents stay balanced. Ties split the surface.
pub(crate) fn choose_step(
    query_children: Option<[usize; 2]>,
    surface_children: Option<[usize; 2]>,
    query_box: &Aabb,
    surface_box: &Aabb,
) -> Step {
    match (query_children, surface_children) {
        (None, None) => Step::LeafPair,
        (None, Some(sc)) => Step::SplitSurface(sc),
        (Some(qc), None) => Step::SplitQuery(qc),
        (Some(qc), Some(sc)) => {
            if query_box.max_extent() <= surface_box.max_extent() {
                Step::SplitSurface(sc)
            } else {
                Step::SplitQuery(qc)
            }
        }
    }
}

/// Mutable state of one search.
///
/// `records[p]` belongs to query point `p` and `sqr_phi_node[n]` to query
/// node `n`; both hierarchies and the surface are only read.
pub(crate) struct DualTreeSearch<'a, Q, S> {
    points: &'a [Point3<f64>],
    query_tree: &'a Q,
    surface: &'a Surface,
    surface_tree: &'a S,
    sqr_phi_node: &'a mut [f64],
    records: &'a mut [ClosestTriangle],
    stats: SearchStats,
}

impl<'a, Q, S> DualTreeSearch<'a, Q, S>
where
    Q: BoundingHierarchy,
    S: BoundingHierarchy,
{
    pub(crate) fn new(
        points: &'a [Point3<f64>],
        query_tree: &'a Q,
        surface: &'a Surface,
        surface_tree: &'a S,
        sqr_phi_node: &'a mut [f64],
        records: &'a mut [ClosestTriangle],
    ) -> Self {
        debug_assert_eq!(sqr_phi_node.len(), query_tree.node_count());
        debug_assert_eq!(records.len(), points.len());
        Self {
            points,
            query_tree,
            surface,
            surface_tree,
            sqr_phi_node,
            records,
            stats: SearchStats::default(),
        }
    }

    /// Run the search from both roots and return the collected counters.
    pub(crate) fn run(mut self) -> SearchStats {
        if self.query_tree.node_count() > 0 && self.surface_tree.node_count() > 0 {
            self.search(0, 0);
        }
        self.stats
    }

    /// Narrow the pair `(qn, sn)`, updating records and node bounds in place.
    pub(crate) fn search(&mut self, qn: usize, sn: usize) {
        let (query_tree, surface_tree) = (self.query_tree, self.surface_tree);
        let query_box = query_tree.bounds(qn);
        let surface_box = surface_tree.bounds(sn);

        match choose_step(
            query_tree.children(qn),
            surface_tree.children(sn),
            query_box,
            surface_box,
        ) {
            Step::LeafPair => self.eval_leaves(qn, sn),
            Step::SplitSurface(children) => {
                let bounds =
                    children.map(|c| box_box_sqr_distance(query_box, surface_tree.bounds(c)));
                let first = usize::from(bounds[1] < bounds[0]);
                for c in [first, 1 - first] {
                    // Re-read the bound: visiting the first child may have lowered it
                    if self.sqr_phi_node[qn] > bounds[c] {
                        self.search(qn, children[c]);
                    } else {
                        self.stats.pruned_surface_nodes += 1;
                    }
                }
            }
            Step::SplitQuery(children) => {
                let mut node_bound: f64 = 0.0;
                for c in children {
                    let lower = box_box_sqr_distance(query_tree.bounds(c), surface_box);
                    if self.sqr_phi_node[c] > lower {
                        self.search(c, sn);
                    } else {
                        self.stats.pruned_query_nodes += 1;
                    }
                    node_bound = node_bound.max(self.sqr_phi_node[c]);
                }
                self.sqr_phi_node[qn] = node_bound;
            }
        }
    }

    fn eval_leaves(&mut self, qn: usize, sn: usize) {
        self.stats.leaf_pairs += 1;
        let (points, surface) = (self.points, self.surface);
        let (query_tree, surface_tree) = (self.query_tree, self.surface_tree);
        let surface_box = surface_tree.bounds(sn);
        let triangles = surface_tree.prims(sn);

        let mut node_bound: f64 = 0.0;
        for &p in query_tree.prims(qn) {
            let x = &points[p];
            let record = &mut self.records[p];
            if record.phi > point_box_sqr_distance(x, surface_box) {
                for &t in triangles {
                    let close = surface.closest_point(t, x);
                    let delta = x - close.point;
                    record.offer(delta.norm_squared(), delta, t, close.weights);
                }
                self.stats.triangle_tests += triangles.len() as u64;
            } else {
                self.stats.pruned_points += 1;
            }
            node_bound = node_bound.max(record.phi);
        }
        self.sqr_phi_node[qn] = node_bound;
    }
}
