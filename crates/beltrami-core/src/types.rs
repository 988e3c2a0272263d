//! Scalar trait and symmetric tensor helpers.
//!
//! Diffusion tensors are stored as their six lower-triangular entries in the
//! order `(Dxx, Dxy, Dyy, Dxz, Dyz, Dzz)`. The helpers below move between
//! that packed form and a full nalgebra [`Matrix3`].

use nalgebra::{Matrix3, RealField, SVector, Scalar as NalgebraScalar};
use num_traits::Float;
use std::fmt::{Debug, Display};

/// Number of independent components of a symmetric 3×3 tensor.
pub const SYM6: usize = 6;

/// Trait for scalar types used by the field operators (f32 or f64).
pub trait Scalar:
    NalgebraScalar
    + RealField
    + Float
    + Display
    + Debug
    + Default
    + Copy
    + Send
    + Sync
    + 'static
{
    /// Relative tolerance for a tensor → coordinates → tensor round trip.
    const ROUND_TRIP_TOLERANCE: Self;

    /// Convert to f64 for error reporting and logging.
    ///
    /// Values that cannot be represented come back as NaN.
    fn to_f64_lossy(self) -> f64 {
        num_traits::cast(self).unwrap_or(f64::NAN)
    }
}

impl Scalar for f32 {
    const ROUND_TRIP_TOLERANCE: Self = 1e-4;
}

impl Scalar for f64 {
    const ROUND_TRIP_TOLERANCE: Self = 1e-10;
}

/// Packed symmetric tensor or coordinate vector of one voxel.
pub type Sym6<T> = SVector<T, SYM6>;

/// Expands packed `(Dxx, Dxy, Dyy, Dxz, Dyz, Dzz)` into a symmetric matrix.
pub fn sym6_to_matrix<T: Scalar>(d: &Sym6<T>) -> Matrix3<T> {
    Matrix3::new(
        d[0], d[1], d[3], //
        d[1], d[2], d[4], //
        d[3], d[4], d[5],
    )
}

/// Packs the lower triangle of a 3×3 matrix as `(Dxx, Dxy, Dyy, Dxz, Dyz, Dzz)`.
///
/// The upper triangle is ignored.
pub fn matrix_to_sym6<T: Scalar>(m: &Matrix3<T>) -> Sym6<T> {
    Sym6::from([
        m[(0, 0)],
        m[(1, 0)],
        m[(1, 1)],
        m[(2, 0)],
        m[(2, 1)],
        m[(2, 2)],
    ])
}

/// Checks positive-definiteness of a packed tensor through a Cholesky factorization.
pub fn is_positive_definite<T: Scalar>(d: &Sym6<T>) -> bool {
    match sym6_to_matrix(d).cholesky() {
        Some(chol) => chol
            .l()
            .diagonal()
            .iter()
            .all(|&l| l > T::zero() && <T as Float>::is_finite(l)),
        None => false,
    }
}
