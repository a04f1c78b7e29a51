//! Levelset evaluation entry points.

use std::slice;

use mesh_types::{IndexedMesh, Point3, Vector3};
use tracing::{debug, info};

use crate::candidate::ClosestTriangle;
use crate::config::LevelsetConfig;
use crate::error::{LevelsetError, LevelsetResult};
use crate::finalize::{finalize_records, relative_epsilon};
use crate::hierarchy::{BoundingHierarchy, Bvh};
use crate::surface::Surface;
use crate::traversal::{DualTreeSearch, SearchStats};

/// Evaluate the closest surface triangle for every query point, writing
/// into a caller-owned buffer.
///
/// `query_tree` must be built over `points` and `surface_tree` over the
/// triangles of `surface`. On return `records[i]` holds the (signed, if
/// enabled) distance of `points[i]`, a unit normal pointing away from the
/// surface, the owning triangle and the barycentric weights of the closest
/// point. Points with nothing within `config.max_distance` report no
/// triangle, a zero normal and the cutoff as distance.
///
/// # Errors
///
/// - [`LevelsetError::InvalidMaxDistance`] if the cutoff is negative or NaN.
/// - [`LevelsetError::SizeMismatch`] if `records` and `points` differ in length.
/// - [`LevelsetError::HierarchyMismatch`] if either hierarchy was built over a
///   different number of primitives.
///
/// Validation happens before any record is touched.
pub fn surface_levelset_in_place<Q, S>(
    points: &[Point3<f64>],
    query_tree: &Q,
    surface: &Surface,
    surface_tree: &S,
    records: &mut [ClosestTriangle],
    config: &LevelsetConfig,
) -> LevelsetResult<SearchStats>
where
    Q: BoundingHierarchy,
    S: BoundingHierarchy,
{
    config.validate()?;
    if records.len() != points.len() {
        return Err(LevelsetError::SizeMismatch {
            expected: points.len(),
            actual: records.len(),
        });
    }
    check_hierarchy("query", query_tree, points.len())?;
    check_hierarchy("surface", surface_tree, surface.len())?;

    info!(
        points = points.len(),
        triangles = surface.len(),
        max_distance = config.max_distance,
        signed = config.compute_signs,
        "Starting levelset evaluation"
    );

    let sqr_max = config.max_distance * config.max_distance;
    records.fill(ClosestTriangle::unbounded(sqr_max));

    let mut stats = if points.is_empty() || surface.is_empty() {
        debug!("Empty input, skipping traversal");
        SearchStats::default()
    } else {
        let mut sqr_phi_node = vec![sqr_max; query_tree.node_count()];
        DualTreeSearch::new(
            points,
            query_tree,
            surface,
            surface_tree,
            &mut sqr_phi_node,
            records,
        )
        .run()
    };

    let epsilon = relative_epsilon(query_tree.root_bounds(), surface_tree.root_bounds());
    stats.degenerate_signs = finalize_records(
        points,
        surface,
        records,
        config.compute_signs,
        epsilon,
        config.parallel,
    );

    debug!(
        leaf_pairs = stats.leaf_pairs,
        triangle_tests = stats.triangle_tests,
        evaluation_ratio = format!("{:.4}", stats.evaluation_ratio(points.len(), surface.len())),
        pruned_surface_nodes = stats.pruned_surface_nodes,
        pruned_query_nodes = stats.pruned_query_nodes,
        pruned_points = stats.pruned_points,
        "Levelset traversal complete"
    );
    if stats.degenerate_signs > 0 {
        debug!(
            count = stats.degenerate_signs,
            "Points on the surface fell back to zero distance"
        );
    }

    Ok(stats)
}

/// Like [`surface_levelset_in_place`], but allocates the result.
///
/// # Errors
///
/// Same as [`surface_levelset_in_place`], minus the size mismatch.
pub fn surface_levelset<Q, S>(
    points: &[Point3<f64>],
    query_tree: &Q,
    surface: &Surface,
    surface_tree: &S,
    config: &LevelsetConfig,
) -> LevelsetResult<Levelset>
where
    Q: BoundingHierarchy,
    S: BoundingHierarchy,
{
    let mut records = vec![ClosestTriangle::unbounded(0.0); points.len()];
    let stats = surface_levelset_in_place(
        points,
        query_tree,
        surface,
        surface_tree,
        &mut records,
        config,
    )?;
    Ok(Levelset { records, stats })
}

fn check_hierarchy<H: BoundingHierarchy>(
    hierarchy: &'static str,
    tree: &H,
    expected: usize,
) -> LevelsetResult<()> {
    let actual = tree.primitive_count();
    if actual == expected {
        Ok(())
    } else {
        Err(LevelsetError::HierarchyMismatch {
            hierarchy,
            expected,
            actual,
        })
    }
}

/// Per-point results of a levelset evaluation.
#[derive(Debug, Clone, Default)]
pub struct Levelset {
    records: Vec<ClosestTriangle>,
    stats: SearchStats,
}

impl Levelset {
    /// Number of evaluated points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no points were evaluated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// One record per query point, in input order.
    #[must_use]
    pub fn records(&self) -> &[ClosestTriangle] {
        &self.records
    }

    /// Take ownership of the records.
    #[must_use]
    pub fn into_records(self) -> Vec<ClosestTriangle> {
        self.records
    }

    /// Counters from the search.
    #[must_use]
    pub const fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Distance column.
    #[must_use]
    pub fn distances(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.phi).collect()
    }

    /// Normal column.
    #[must_use]
    pub fn normals(&self) -> Vec<Vector3<f64>> {
        self.records.iter().map(|r| r.normal).collect()
    }

    /// Triangle column.
    #[must_use]
    pub fn triangles(&self) -> Vec<Option<usize>> {
        self.records.iter().map(|r| r.triangle).collect()
    }

    /// Barycentric weight column.
    #[must_use]
    pub fn weights(&self) -> Vec<Vector3<f64>> {
        self.records.iter().map(|r| r.weights).collect()
    }
}

/// A surface with its hierarchy, ready to answer queries.
///
/// # Example
///
/// ```
/// use mesh_levelset::{LevelsetConfig, SurfaceLevelset};
/// use mesh_types::{Point3, unit_cube};
///
/// let levelset = SurfaceLevelset::new(&unit_cube(), LevelsetConfig::default()).unwrap();
/// let result = levelset.evaluate(&[Point3::new(0.5, 0.5, 0.5)]).unwrap();
///
/// assert!((result.distances()[0] + 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct SurfaceLevelset {
    surface: Surface,
    tree: Bvh,
    config: LevelsetConfig,
}

impl SurfaceLevelset {
    /// Build the surface and its hierarchy from a mesh.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or a face references
    /// a missing vertex.
    pub fn new(mesh: &IndexedMesh, config: LevelsetConfig) -> LevelsetResult<Self> {
        Self::from_surface(Surface::from_mesh(mesh)?, config)
    }

    /// Wrap an already built surface.
    ///
    /// # Errors
    ///
    /// Returns [`LevelsetError::InvalidMaxDistance`] for an invalid cutoff.
    pub fn from_surface(surface: Surface, config: LevelsetConfig) -> LevelsetResult<Self> {
        config.validate()?;
        let tree = Bvh::from_surface(&surface, config.leaf_size);
        Ok(Self {
            surface,
            tree,
            config,
        })
    }

    /// The wrapped surface.
    #[must_use]
    pub const fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Hierarchy over the surface triangles.
    #[must_use]
    pub const fn tree(&self) -> &Bvh {
        &self.tree
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &LevelsetConfig {
        &self.config
    }

    /// Evaluate a batch of points.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`surface_levelset`].
    pub fn evaluate(&self, points: &[Point3<f64>]) -> LevelsetResult<Levelset> {
        let query_tree = Bvh::from_points(points, self.config.leaf_size);
        surface_levelset(points, &query_tree, &self.surface, &self.tree, &self.config)
    }

    /// Closest triangle record for a single point.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`surface_levelset_in_place`].
    pub fn closest(&self, point: Point3<f64>) -> LevelsetResult<ClosestTriangle> {
        let points = slice::from_ref(&point);
        let query_tree = Bvh::from_points(points, 1);
        let mut record = [ClosestTriangle::unbounded(0.0)];
        let config = self.config.clone().with_parallel(false);
        surface_levelset_in_place(
            points,
            &query_tree,
            &self.surface,
            &self.tree,
            &mut record,
            &config,
        )?;
        Ok(record[0])
    }
}
