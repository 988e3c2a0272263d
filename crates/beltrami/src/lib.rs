//! Numerical primitives for Beltrami-regularized free-water DTI fitting.
//!
//! The free-water elimination model fits a tissue diffusion tensor and an
//! isotropic free-water fraction per voxel, with spatial regularization of
//! the tensor field. Regularizing directly in tensor space would break
//! positive-definiteness, so the fitting loop works in Iwasawa coordinates
//! instead:
//!
//! 1. select voxels with a [`Mask`](base::Mask),
//! 2. map tensors to coordinates with [`to_manifold`](manifolds::to_manifold),
//! 3. differentiate each coordinate channel along each axis with
//!    [`forward_diff`](stencil::forward_diff) /
//!    [`backward_diff`](stencil::backward_diff) (or all at once with
//!    [`field_gradient`](stencil::field_gradient)),
//! 4. after the update, map back with
//!    [`from_manifold`](manifolds::from_manifold).
//!
//! The coordinate map and the stencils are independent of each other.
//!
//! ```
//! use beltrami::prelude::*;
//!
//! let shape = [2, 2, 2];
//! let identity = Sym6::from([1.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
//! let tensors = TensorField::from_voxels(&shape, &[identity; 8])?;
//! let mask = Mask::full(&shape, true);
//!
//! let coords = to_manifold(&tensors, &mask)?;
//! let grad = field_gradient(&coords, &VoxelSize::isotropic(1.0)?, Stencil::Forward)?;
//! assert!(grad.along(Axis::X).as_slice().iter().all(|&g| g == 0.0));
//!
//! let back = from_manifold(&coords, &mask)?;
//! assert_eq!(back, tensors);
//! # Ok::<(), BeltramiError>(())
//! ```

pub use beltrami_core as base;
pub use beltrami_manifolds as manifolds;
pub use beltrami_stencil as stencil;

// Re-export nalgebra for convenience
pub use nalgebra;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use beltrami_core::prelude::*;
    pub use beltrami_manifolds::{
        from_manifold, max_round_trip_error, to_manifold, try_from_manifold, try_to_manifold,
        Chart, Iwasawa,
    };
    pub use beltrami_stencil::{
        backward_diff, divergence, field_divergence, field_gradient, forward_diff,
        volume_gradient, FieldGradient, Stencil,
    };
}
