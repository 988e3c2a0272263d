//! Per-voxel coordinate charts on symmetric positive definite 3×3 tensors.

use beltrami_core::types::{Scalar, Sym6};
use std::fmt::Debug;

/// A pivot that is not strictly positive and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivotViolation<T> {
    /// Coordinate name of the pivot (e.g. `"X2"`)
    pub pivot: &'static str,
    /// Offending value
    pub value: T,
}

/// A bijection between packed SPD tensors and six unconstrained coordinates.
///
/// Implementations must be pure: the same input always maps to the same
/// output and no state is shared between voxels, which is what allows the
/// field-level conversions to shard voxels freely.
pub trait Chart<T: Scalar>: Debug + Send + Sync {
    /// Name of the chart.
    fn name(&self) -> &str;

    /// Maps a packed tensor `(Dxx, Dxy, Dyy, Dxz, Dyz, Dzz)` to coordinates.
    ///
    /// The tensor must be positive definite; otherwise the result may
    /// contain NaN or infinities.
    fn to_coordinates(&self, tensor: &Sym6<T>) -> Sym6<T>;

    /// Maps coordinates back to a packed tensor.
    fn to_tensor(&self, coordinates: &Sym6<T>) -> Sym6<T>;

    /// First pivot of `coordinates` that is not strictly positive and finite.
    fn find_pivot_violation(&self, coordinates: &Sym6<T>) -> Option<PivotViolation<T>>;

    /// Whether `coordinates` describe a positive definite tensor.
    fn is_valid_coordinates(&self, coordinates: &Sym6<T>) -> bool {
        self.find_pivot_violation(coordinates).is_none()
    }

    /// Whether `tensor` lies in the domain of this chart.
    fn is_valid_tensor(&self, tensor: &Sym6<T>) -> bool {
        self.is_valid_coordinates(&self.to_coordinates(tensor))
    }
}
