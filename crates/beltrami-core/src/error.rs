//! Error types for tensor-field conversions and grid operators.
//!
//! Every error here is local to a single call: the operations are pure
//! functions, so nothing is retried or partially applied.

use thiserror::Error;

/// Errors that can occur while converting or differentiating voxel fields.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BeltramiError {
    /// Dimension mismatch between a field, a mask or a data buffer.
    ///
    /// Raised before any computation takes place.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// Axis selector outside `{0, 1, 2}`.
    #[error("Invalid axis {axis}: expected 0, 1 or 2")]
    InvalidAxis {
        /// The rejected selector
        axis: usize,
    },

    /// Voxel spacing that is not strictly positive and finite.
    #[error("Invalid voxel size {value} along axis {axis}")]
    InvalidVoxelSize {
        /// Axis the spacing belongs to
        axis: usize,
        /// The rejected spacing
        value: f64,
    },

    /// A masked tensor failed the positive-definiteness check.
    ///
    /// Only the checked conversions report this; the unchecked ones let
    /// NaN/Inf propagate instead.
    #[error("Tensor at voxel {voxel} is not positive definite: pivot {pivot} = {value}")]
    NotPositiveDefinite {
        /// Flat index of the offending voxel
        voxel: usize,
        /// Name of the first non-positive pivot (X1, X2 or X3)
        pivot: &'static str,
        /// Value of that pivot
        value: f64,
    },

    /// A masked coordinate vector does not describe a valid tensor.
    #[error("Invalid manifold coordinates at voxel {voxel}: {reason}")]
    InvalidCoordinates {
        /// Flat index of the offending voxel
        voxel: usize,
        /// Description of why the coordinates are invalid
        reason: String,
    },
}

impl BeltramiError {
    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create an InvalidAxis error.
    pub fn invalid_axis(axis: usize) -> Self {
        Self::InvalidAxis { axis }
    }

    /// Create an InvalidVoxelSize error.
    pub fn invalid_voxel_size(axis: usize, value: f64) -> Self {
        Self::InvalidVoxelSize { axis, value }
    }

    /// Create a NotPositiveDefinite error for the given voxel and pivot.
    pub fn not_positive_definite(voxel: usize, pivot: &'static str, value: f64) -> Self {
        Self::NotPositiveDefinite {
            voxel,
            pivot,
            value,
        }
    }

    /// Create an InvalidCoordinates error with a custom reason.
    pub fn invalid_coordinates<S: Into<String>>(voxel: usize, reason: S) -> Self {
        Self::InvalidCoordinates {
            voxel,
            reason: reason.into(),
        }
    }
}

/// Result type alias for operations that can produce BeltramiError.
pub type Result<T> = std::result::Result<T, BeltramiError>;
