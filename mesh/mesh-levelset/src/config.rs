//! Configuration for levelset evaluation.
//!
//! # Example
//!
//! ```
//! use mesh_levelset::LevelsetConfig;
//!
//! // Signed distances, nothing farther than 2 units
//! let config = LevelsetConfig::default().with_max_distance(2.0);
//!
//! // Unsigned distances on the calling thread only
//! let config = LevelsetConfig::unsigned().with_parallel(false);
//! assert!(!config.compute_signs);
//! ```

use crate::error::{LevelsetError, LevelsetResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for a levelset evaluation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LevelsetConfig {
    /// Search cutoff, exclusive. Only triangles strictly closer than this
    /// are accepted; points with none report no triangle and keep this
    /// value as their distance.
    pub max_distance: f64,

    /// Classify points as inside/outside and negate inside distances.
    pub compute_signs: bool,

    /// Whether to run the per-point finalization pass with rayon.
    pub parallel: bool,

    /// Maximum primitives per leaf when hierarchies are built by
    /// [`SurfaceLevelset`](crate::SurfaceLevelset).
    pub leaf_size: usize,
}

impl Default for LevelsetConfig {
    fn default() -> Self {
        Self {
            max_distance: f64::INFINITY,
            compute_signs: true,
            parallel: true,
            leaf_size: 8,
        }
    }
}

impl LevelsetConfig {
    /// Unsigned distances with no cutoff.
    #[must_use]
    pub fn unsigned() -> Self {
        Self {
            compute_signs: false,
            ..Self::default()
        }
    }

    /// Set the search cutoff.
    #[must_use]
    pub const fn with_max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = max_distance;
        self
    }

    /// Enable or disable inside/outside classification.
    #[must_use]
    pub const fn with_signs(mut self, compute_signs: bool) -> Self {
        self.compute_signs = compute_signs;
        self
    }

    /// Enable or disable the parallel finalization pass.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the leaf size used when building hierarchies.
    #[must_use]
    pub const fn with_leaf_size(mut self, leaf_size: usize) -> Self {
        self.leaf_size = leaf_size;
        self
    }

    /// Check the configuration before a search.
    ///
    /// # Errors
    ///
    /// Returns [`LevelsetError::InvalidMaxDistance`] if the cutoff is
    /// negative or NaN.
    pub fn validate(&self) -> LevelsetResult<()> {
        if self.max_distance.is_nan() || self.max_distance < 0.0 {
            return Err(LevelsetError::InvalidMaxDistance(self.max_distance));
        }
        Ok(())
    }
}
