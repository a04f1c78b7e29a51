//! Closest-point and signed distance queries against triangle surfaces.
//!
//! For every query point this crate finds the nearest triangle of a surface,
//! the barycentric location of the closest point on it, the distance, and a
//! unit normal pointing from the surface towards the point. With signs
//! enabled, points enclosed by a closed surface get negative distances.
//!
//! Points and triangles each live in a bounding volume hierarchy, and the
//! two hierarchies are descended together with branch-and-bound pruning.
//! The result is exact: identical to checking every point against every
//! triangle, at a fraction of the cost.
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It depends on
//! `mesh-types` for geometry and uses `rayon` for the per-point
//! finalization pass.
//!
//! # Signs
//!
//! Inside/outside is decided from angle-weighted pseudo-normals at the
//! closest feature (face, edge or vertex), which is exact for closed,
//! consistently oriented surfaces, convex or not. Points lying on the
//! surface get distance zero and are counted in
//! [`SearchStats::degenerate_signs`].
//!
//! # Example
//!
//! ```
//! use mesh_levelset::{Bvh, LevelsetConfig, Surface, surface_levelset};
//! use mesh_types::{Point3, unit_cube};
//!
//! let surface = Surface::from_mesh(&unit_cube()).unwrap();
//! let surface_tree = Bvh::from_surface(&surface, 4);
//!
//! let points = [Point3::new(0.5, 0.5, 0.25), Point3::new(0.5, 0.5, 3.0)];
//! let query_tree = Bvh::from_points(&points, 4);
//!
//! let levelset = surface_levelset(
//!     &points,
//!     &query_tree,
//!     &surface,
//!     &surface_tree,
//!     &LevelsetConfig::default(),
//! )
//! .unwrap();
//!
//! let phi = levelset.distances();
//! assert!((phi[0] + 0.25).abs() < 1e-12); // inside
//! assert!((phi[1] - 2.0).abs() < 1e-12); // outside
//! ```
//!
//! For repeated queries against the same mesh, [`SurfaceLevelset`] owns the
//! surface and its hierarchy.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![allow(clippy::module_name_repetitions)]

mod bound;
mod candidate;
mod config;
mod error;
mod finalize;
mod hierarchy;
mod levelset;
pub mod oracle;
mod surface;
mod traversal;

pub use bound::{box_box_sqr_distance, point_box_sqr_distance};
pub use candidate::ClosestTriangle;
pub use config::LevelsetConfig;
pub use error::{LevelsetError, LevelsetResult};
pub use hierarchy::{BoundingHierarchy, Bvh, BvhNode};
pub use levelset::{Levelset, SurfaceLevelset, surface_levelset, surface_levelset_in_place};
pub use surface::{Sidedness, Surface};
pub use traversal::SearchStats;
