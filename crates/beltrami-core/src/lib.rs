//! Core types for Beltrami-regularized free-water diffusion fitting.
//!
//! This crate holds everything the coordinate map and the finite-difference
//! stencils share: the scalar trait, the error type, dense voxel-grid
//! containers and the thresholds that decide when voxel-wise work is
//! spread over the rayon pool.
//!
//! # Modules
//!
//! - [`config`]: Parallel execution thresholds
//! - [`error`]: Error types for conversions and grid operators
//! - [`grid`]: `Volume`, `Mask`, `VoxelField`, `Axis` and `VoxelSize`
//! - [`types`]: Scalar trait and symmetric tensor helpers
//! - [`validation`]: Masked comparisons between fields

pub mod config;
pub mod error;
pub mod grid;
pub mod types;
pub mod validation;

// Re-export commonly used items at the crate root
pub use error::{BeltramiError, Result};
pub use grid::{Axis, ManifoldField, Mask, TensorField, Volume, VoxelField, VoxelSize};
pub use types::{Scalar, Sym6, SYM6};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use beltrami_core::prelude::*;
///
/// let volume = Volume::<f64>::zeros([2, 2, 2]);
/// assert_eq!(volume.len(), 8);
/// ```
pub mod prelude {
    pub use crate::config::{get_parallel_config, ParallelThresholdsConfig};
    pub use crate::error::{BeltramiError, Result};
    pub use crate::grid::{Axis, ManifoldField, Mask, TensorField, Volume, VoxelField, VoxelSize};
    pub use crate::types::{is_positive_definite, matrix_to_sym6, sym6_to_matrix, Scalar, Sym6};
}
