//! Beltrami Stencil - finite differences over 3D voxel grids.
//!
//! Forward and backward first-order differences along a chosen axis, with a
//! zero-gradient boundary and voxel-size normalization, plus helpers that
//! apply them across all channels and axes of a manifold-coordinate field.
//!
//! ```
//! use beltrami_core::{Axis, Volume};
//! use beltrami_stencil::{backward_diff, forward_diff};
//!
//! let f = Volume::from_vec([4, 1, 1], vec![1.0, 2.0, 4.0, 7.0])?;
//! assert_eq!(forward_diff(&f, Axis::X, 1.0).as_slice(), &[1.0, 2.0, 3.0, 0.0]);
//! assert_eq!(backward_diff(&f, Axis::X, 1.0).as_slice(), &[0.0, 1.0, 2.0, 3.0]);
//! # Ok::<(), beltrami_core::BeltramiError>(())
//! ```

pub mod difference;
pub mod gradient;

pub use difference::{backward_diff, forward_diff, shifted_difference, Stencil};
pub use gradient::{divergence, field_divergence, field_gradient, volume_gradient, FieldGradient};
