//! Error types for levelset evaluation.

use thiserror::Error;

/// Result type for levelset operations.
pub type LevelsetResult<T> = Result<T, LevelsetError>;

/// Errors that can occur before a levelset search starts.
///
/// Nothing in here is raised once traversal has begun: degenerate sign
/// tests are resolved per point by the finalizer.
#[derive(Debug, Error)]
pub enum LevelsetError {
    /// Output buffer length does not match the number of query points.
    #[error("record buffer holds {actual} entries but there are {expected} query points")]
    SizeMismatch {
        /// Number of query points.
        expected: usize,
        /// Length of the record buffer.
        actual: usize,
    },

    /// A hierarchy was built over a different primitive set.
    #[error("{hierarchy} hierarchy covers {actual} primitives, expected {expected}")]
    HierarchyMismatch {
        /// Which hierarchy ("query" or "surface").
        hierarchy: &'static str,
        /// Number of primitives in the input set.
        expected: usize,
        /// Number of primitives the hierarchy reports.
        actual: usize,
    },

    /// Distance cutoff is negative or NaN.
    #[error("invalid max distance: {0}")]
    InvalidMaxDistance(f64),

    /// A mesh face references a vertex that does not exist.
    #[error("face {face} references missing vertex {vertex}")]
    InvalidFace {
        /// Face index.
        face: usize,
        /// Offending vertex index.
        vertex: u32,
    },
}
