//! # Iwasawa Coordinates on S⁺⁺(3)
//!
//! A symmetric positive definite 3×3 tensor has a unique LDLᵗ factorization
//! with unit lower-triangular `L` and positive diagonal `diag(X1, X2, X3)`:
//!
//! ```text
//!     ⎡ 1   0   0 ⎤       ⎡ X1          ⎤
//! L = ⎢ X4  1   0 ⎥   Λ = ⎢     X2      ⎥   D = L Λ Lᵗ
//!     ⎣ X5  X6  1 ⎦       ⎣         X3  ⎦
//! ```
//!
//! The six numbers `(X1, …, X6)` are the Iwasawa coordinates. The pivots
//! X1, X2, X3 must be positive; the multipliers X4, X5, X6 are free. Written
//! out component-wise, with the tensor packed as
//! `(Dxx, Dxy, Dyy, Dxz, Dyz, Dzz)`:
//!
//! ```text
//! X1 = Dxx                        Dxx = X1
//! X4 = Dxy / Dxx                  Dxy = X1·X4
//! X5 = Dxz / Dxx                  Dyy = X2 + X1·X4²
//! X2 = Dyy − X1·X4²               Dxz = X1·X5
//! X6 = (Dyz − X1·X4·X5) / X2      Dyz = X1·X4·X5 + X2·X6
//! X3 = Dzz − X1·X5² − X2·X6²      Dzz = X3 + X1·X5² + X2·X6²
//! ```
//!
//! Coordinates are stored in the order `(X1, X2, X3, X4, X5, X6)`.
//!
//! ## References
//!
//! - Pasternak, Sochen, Gur, Intrator, Assaf (2009). Free water elimination
//!   and mapping from diffusion MRI. MRM 62(3), 717–730.
//! - Gur, Sochen (2007). Fast invariant Riemannian DT-MRI regularization.
//!   ICCV 2007.

use crate::chart::{Chart, PivotViolation};
use beltrami_core::types::{Scalar, Sym6};
use nalgebra::{Matrix3, Vector3};
use num_traits::Float;

/// Names of the pivot coordinates, in storage order.
pub const PIVOT_NAMES: [&str; 3] = ["X1", "X2", "X3"];

/// The Iwasawa (LDLᵗ) chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Iwasawa;

impl Iwasawa {
    /// The pivots `(X1, X2, X3)` of a coordinate vector.
    pub fn pivots<T: Scalar>(coordinates: &Sym6<T>) -> [T; 3] {
        [coordinates[0], coordinates[1], coordinates[2]]
    }

    /// The LDLᵗ factors `(L, diag(Λ))` described by a coordinate vector.
    pub fn ldl_factors<T: Scalar>(coordinates: &Sym6<T>) -> (Matrix3<T>, Vector3<T>) {
        let (x4, x5, x6) = (coordinates[3], coordinates[4], coordinates[5]);
        let (zero, one) = (T::zero(), T::one());
        let l = Matrix3::new(
            one, zero, zero, //
            x4, one, zero, //
            x5, x6, one,
        );
        (l, Vector3::new(coordinates[0], coordinates[1], coordinates[2]))
    }
}

impl<T: Scalar> Chart<T> for Iwasawa {
    fn name(&self) -> &str {
        "Iwasawa"
    }

    fn to_coordinates(&self, tensor: &Sym6<T>) -> Sym6<T> {
        let (dxx, dxy, dyy) = (tensor[0], tensor[1], tensor[2]);
        let (dxz, dyz, dzz) = (tensor[3], tensor[4], tensor[5]);

        let x1 = dxx;
        let x4 = dxy / dxx;
        let x5 = dxz / dxx;
        let x2 = dyy - x1 * x4 * x4;
        let x6 = (dyz - x1 * x4 * x5) / x2;
        let x3 = dzz - x1 * x5 * x5 - x2 * x6 * x6;

        Sym6::from([x1, x2, x3, x4, x5, x6])
    }

    fn to_tensor(&self, coordinates: &Sym6<T>) -> Sym6<T> {
        let (x1, x2, x3) = (coordinates[0], coordinates[1], coordinates[2]);
        let (x4, x5, x6) = (coordinates[3], coordinates[4], coordinates[5]);

        Sym6::from([
            x1,
            x1 * x4,
            x2 + x1 * x4 * x4,
            x1 * x5,
            x1 * x4 * x5 + x2 * x6,
            x3 + x1 * x5 * x5 + x2 * x6 * x6,
        ])
    }

    fn find_pivot_violation(&self, coordinates: &Sym6<T>) -> Option<PivotViolation<T>> {
        PIVOT_NAMES
            .iter()
            .zip(Self::pivots(coordinates))
            .find(|(_, value)| !(*value > T::zero() && <T as Float>::is_finite(*value)))
            .map(|(&pivot, value)| PivotViolation { pivot, value })
    }
}
