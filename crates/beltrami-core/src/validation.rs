//! Numerical comparison of voxel fields over a mask.

use crate::{
    error::{BeltramiError, Result},
    grid::{Mask, VoxelField},
    types::{Scalar, SYM6},
};
use num_traits::Float;

/// Largest deviation between two fields over masked voxels.
///
/// Each component contributes `|a - b| / max(|a|, |b|, 1)`, i.e. a relative
/// error for large magnitudes and an absolute one near zero. Returns zero
/// when the mask selects nothing.
pub fn max_relative_deviation<T: Scalar>(
    a: &VoxelField<T>,
    b: &VoxelField<T>,
    mask: &Mask,
) -> Result<T> {
    check_pair(a, b, mask)?;

    let mut worst = T::zero();
    for ((va, vb), &selected) in a
        .as_slice()
        .chunks_exact(SYM6)
        .zip(b.as_slice().chunks_exact(SYM6))
        .zip(mask.as_slice())
    {
        if !selected {
            continue;
        }
        for (&x, &y) in va.iter().zip(vb) {
            let magnitude = <T as Float>::max(<T as Float>::abs(x), <T as Float>::abs(y));
            let scale = <T as Float>::max(magnitude, T::one());
            let err = <T as Float>::abs(x - y) / scale;
            // NaN must not be swallowed by max().
            if <T as Float>::is_nan(err) {
                return Ok(err);
            }
            worst = <T as Float>::max(worst, err);
        }
    }
    Ok(worst)
}

/// Whether two fields agree component-wise over masked voxels.
pub fn fields_relative_eq<T: Scalar>(
    a: &VoxelField<T>,
    b: &VoxelField<T>,
    mask: &Mask,
    tolerance: T,
) -> Result<bool> {
    check_pair(a, b, mask)?;

    Ok(a.as_slice()
        .chunks_exact(SYM6)
        .zip(b.as_slice().chunks_exact(SYM6))
        .zip(mask.as_slice())
        .filter(|(_, selected)| **selected)
        .all(|((va, vb), _)| {
            va.iter().zip(vb).all(|(&x, &y)| {
                approx::relative_eq!(x, y, epsilon = tolerance, max_relative = tolerance)
            })
        }))
}

/// Whether every unmasked voxel is exactly zero in all channels.
pub fn unmasked_is_zero<T: Scalar>(field: &VoxelField<T>, mask: &Mask) -> Result<bool> {
    field.check_mask(mask)?;

    Ok(field
        .as_slice()
        .chunks_exact(SYM6)
        .zip(mask.as_slice())
        .filter(|(_, selected)| !**selected)
        .all(|(v, _)| v.iter().all(|&x| x == T::zero())))
}

fn check_pair<T: Scalar>(a: &VoxelField<T>, b: &VoxelField<T>, mask: &Mask) -> Result<()> {
    if a.shape() != b.shape() {
        return Err(BeltramiError::dimension_mismatch(
            format!("{:?}", a.shape()),
            format!("{:?}", b.shape()),
        ));
    }
    a.check_mask(mask)
}
