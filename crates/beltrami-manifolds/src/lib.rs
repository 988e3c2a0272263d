//! Beltrami Manifolds - coordinate charts for diffusion-tensor fields.
//!
//! Positive-definiteness is a constraint that gradient steps and smoothing
//! do not respect. This crate maps tensor fields onto Iwasawa coordinates,
//! where the constraint reduces to three positive pivots and every other
//! coordinate is free, and maps them back after the update.
//!
//! ```
//! use beltrami_core::prelude::*;
//! use beltrami_manifolds::{from_manifold, to_manifold};
//!
//! let d: TensorField<f64> = TensorField::from_vec(&[1], vec![2.0, 2.0, 5.0, 4.0, 6.0, 14.0])?;
//! let mask = Mask::full(&[1], true);
//!
//! let x = to_manifold(&d, &mask)?;
//! assert_eq!(x.voxel(0)[1], 3.0);
//!
//! let back = from_manifold(&x, &mask)?;
//! assert!((back.voxel(0)[5] - 14.0).abs() < 1e-12);
//! # Ok::<(), beltrami_core::BeltramiError>(())
//! ```

pub mod chart;
pub mod field;
pub mod iwasawa;

pub use chart::{Chart, PivotViolation};
pub use field::{
    from_manifold, from_manifold_with, max_round_trip_error, to_manifold, to_manifold_with,
    try_from_manifold, try_from_manifold_with, try_to_manifold, try_to_manifold_with,
};
pub use iwasawa::Iwasawa;
