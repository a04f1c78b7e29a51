//! Bounding volume hierarchies consumed by the search.
//!
//! The search only reads hierarchies through [`BoundingHierarchy`]. [`Bvh`]
//! is an arena implementation with a median-split builder; any other
//! binary hierarchy with the same read access works as well.

use mesh_types::{Aabb, Point3};

use crate::surface::Surface;

/// Read access to a binary bounding volume hierarchy.
///
/// Nodes are addressed by index and the root is node `0`. Every node is
/// either a leaf owning a set of primitive ids, or an internal node with
/// exactly two children. A node's box encloses its whole subtree.
pub trait BoundingHierarchy {
    /// Total number of nodes. Zero for an empty hierarchy.
    fn node_count(&self) -> usize;

    /// Number of primitives the hierarchy was built over.
    fn primitive_count(&self) -> usize;

    /// Bounding box of `node`.
    fn bounds(&self, node: usize) -> &Aabb;

    /// The two children of `node`, or `None` if it is a leaf.
    fn children(&self, node: usize) -> Option<[usize; 2]>;

    /// Primitive ids owned by `node`. Empty for internal nodes.
    fn prims(&self, node: usize) -> &[usize];

    /// Whether `node` is a leaf.
    fn is_leaf(&self, node: usize) -> bool {
        self.children(node).is_none()
    }

    /// Bounding box of the whole hierarchy, `None` when empty.
    fn root_bounds(&self) -> Option<&Aabb> {
        (self.node_count() > 0).then(|| self.bounds(0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    /// Owns `prims[start..end]`.
    Leaf { start: usize, end: usize },
    Internal { children: [usize; 2] },
}

/// Arena node of a [`Bvh`].
#[derive(Debug, Clone)]
pub struct BvhNode {
    /// Box enclosing every primitive in this subtree.
    pub bounds: Aabb,
    kind: NodeKind,
}

/// Arena-backed bounding volume hierarchy.
///
/// Leaves reference contiguous ranges of a shared primitive permutation,
/// so every primitive belongs to exactly one leaf.
///
/// # Example
///
/// ```
/// use mesh_levelset::{BoundingHierarchy, Bvh};
/// use mesh_types::Point3;
///
/// let points: Vec<_> = (0..10).map(|i| Point3::new(f64::from(i), 0.0, 0.0)).collect();
/// let bvh = Bvh::from_points(&points, 2);
///
/// assert_eq!(bvh.primitive_count(), 10);
/// assert!(!bvh.is_leaf(0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    prims: Vec<usize>,
}

impl Bvh {
    /// Build a hierarchy over arbitrary primitive boxes.
    ///
    /// Splits at the median primitive center along the longest axis of
    /// each node until at most `max_leaf_size` primitives remain.
    #[must_use]
    pub fn build(boxes: &[Aabb], max_leaf_size: usize) -> Self {
        let mut bvh = Self {
            nodes: Vec::with_capacity(2 * boxes.len() / max_leaf_size.max(1) + 1),
            prims: (0..boxes.len()).collect(),
        };
        if !boxes.is_empty() {
            let centers: Vec<Point3<f64>> = boxes.iter().map(Aabb::center).collect();
            bvh.build_recursive(boxes, &centers, 0, boxes.len(), max_leaf_size.max(1));
        }
        bvh
    }

    /// Build a hierarchy over query points.
    #[must_use]
    pub fn from_points(points: &[Point3<f64>], max_leaf_size: usize) -> Self {
        let boxes: Vec<Aabb> = points.iter().copied().map(Aabb::from_point).collect();
        Self::build(&boxes, max_leaf_size)
    }

    /// Build a hierarchy over the triangles of a surface.
    #[must_use]
    pub fn from_surface(surface: &Surface, max_leaf_size: usize) -> Self {
        let boxes: Vec<Aabb> = surface.triangles().iter().map(|t| t.bounds()).collect();
        Self::build(&boxes, max_leaf_size)
    }

    /// All nodes, root first.
    #[must_use]
    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    /// Check if the hierarchy has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth of the deepest leaf (a lone root leaf has depth 0).
    #[must_use]
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }
        let mut max_depth = 0;
        let mut stack = vec![(0, 0)];
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let NodeKind::Internal { children } = self.nodes[node].kind {
                stack.extend(children.map(|c| (c, depth + 1)));
            }
        }
        max_depth
    }

    fn build_recursive(
        &mut self,
        boxes: &[Aabb],
        centers: &[Point3<f64>],
        start: usize,
        end: usize,
        max_leaf_size: usize,
    ) -> usize {
        let bounds = self.prims[start..end]
            .iter()
            .fold(Aabb::empty(), |acc, &p| acc.union(&boxes[p]));

        let index = self.nodes.len();
        self.nodes.push(BvhNode {
            bounds,
            kind: NodeKind::Leaf { start, end },
        });
        if end - start <= max_leaf_size {
            return index;
        }

        let axis = bounds.longest_axis();
        let mid = start + (end - start) / 2;
        self.prims[start..end]
            .select_nth_unstable_by(mid - start, |&a, &b| centers[a][axis].total_cmp(&centers[b][axis]));

        let left = self.build_recursive(boxes, centers, start, mid, max_leaf_size);
        let right = self.build_recursive(boxes, centers, mid, end, max_leaf_size);
        self.nodes[index].kind = NodeKind::Internal {
            children: [left, right],
        };
        index
    }
}

impl BoundingHierarchy for Bvh {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn primitive_count(&self) -> usize {
        self.prims.len()
    }

    fn bounds(&self, node: usize) -> &Aabb {
        &self.nodes[node].bounds
    }

    fn children(&self, node: usize) -> Option<[usize; 2]> {
        match self.nodes[node].kind {
            NodeKind::Internal { children } => Some(children),
            NodeKind::Leaf { .. } => None,
        }
    }

    fn prims(&self, node: usize) -> &[usize] {
        match self.nodes[node].kind {
            NodeKind::Leaf { start, end } => &self.prims[start..end],
            NodeKind::Internal { .. } => &[],
        }
    }
}
