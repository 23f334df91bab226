//! Error type shared by decomposition and evaluation.
//!
//! All failures are precondition violations detected at call entry.
//! Non-finite sample values are not errors; they propagate through the filter.
use thiserror::Error;

/// Errors reported by decomposition and evaluation.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// Spline order outside the implemented range.
    #[error("Unsupported spline order {0}; orders 0 through 5 are implemented")]
    UnsupportedOrder(usize),

    /// Causal initialization tolerance outside (0, 1).
    #[error("Tolerance must lie strictly between 0 and 1, got {0}")]
    InvalidTolerance(f64),

    /// A block extent of zero along some axis.
    #[error("Block size must be nonzero on every axis")]
    InvalidBlockSize,

    /// A value array or output buffer does not match the interval it is paired with.
    #[error("Shape mismatch: expected {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Wrong number of dimensions in a dims list or observation slice.
    #[error("Dimension mismatch")]
    DimensionMismatch,

    /// Convenience functions dispatch on a fixed maximum number of dimensions.
    #[error("Dimension {0} exceeds maximum (8). Use the interpolator struct directly for higher dimensions.")]
    TooManyDimensions(usize),

    /// A query coordinate is not finite, or its grid index does not fit in `isize`.
    #[error("Unrepresentable coordinate value")]
    UnrepresentableCoordinate,

    /// An unclipped result does not fit in the destination type.
    #[error("Unrepresentable output value")]
    UnrepresentableValue,
}

pub type Result<T> = core::result::Result<T, Error>;
