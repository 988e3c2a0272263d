//! Masked conversions between tensor fields and manifold-coordinate fields.
//!
//! Outputs are freshly allocated and zero-initialized; only voxels selected
//! by the mask are written. Unmasked input data is discarded, not copied,
//! so a caller that needs passthrough must merge the result manually.

use crate::chart::Chart;
use crate::iwasawa::Iwasawa;
use beltrami_core::{
    config::get_parallel_config,
    error::{BeltramiError, Result},
    grid::{ManifoldField, Mask, TensorField, VoxelField},
    types::{Scalar, Sym6, SYM6},
    validation::max_relative_deviation,
};
use rayon::prelude::*;

/// Converts a tensor field to Iwasawa coordinates at masked voxels.
///
/// Masked tensors must be positive definite. This is not checked: a
/// violation shows up as NaN or infinite coordinates. Use
/// [`try_to_manifold`] to have it reported instead.
///
/// Fails only if `mask` does not match the field's spatial shape.
pub fn to_manifold<T: Scalar>(tensors: &TensorField<T>, mask: &Mask) -> Result<ManifoldField<T>> {
    to_manifold_with(&Iwasawa, tensors, mask)
}

/// Converts Iwasawa coordinates back to packed tensors at masked voxels.
///
/// Exact algebraic inverse of [`to_manifold`].
pub fn from_manifold<T: Scalar>(
    coordinates: &ManifoldField<T>,
    mask: &Mask,
) -> Result<TensorField<T>> {
    from_manifold_with(&Iwasawa, coordinates, mask)
}

/// Like [`to_manifold`], but fails on the first masked voxel (in storage
/// order) whose tensor is not positive definite.
pub fn try_to_manifold<T: Scalar>(
    tensors: &TensorField<T>,
    mask: &Mask,
) -> Result<ManifoldField<T>> {
    try_to_manifold_with(&Iwasawa, tensors, mask)
}

/// Like [`from_manifold`], but fails if any masked coordinate vector has a
/// pivot that is not strictly positive and finite.
pub fn try_from_manifold<T: Scalar>(
    coordinates: &ManifoldField<T>,
    mask: &Mask,
) -> Result<TensorField<T>> {
    try_from_manifold_with(&Iwasawa, coordinates, mask)
}

/// Tensor → coordinates through an arbitrary chart.
pub fn to_manifold_with<T, C>(
    chart: &C,
    tensors: &TensorField<T>,
    mask: &Mask,
) -> Result<ManifoldField<T>>
where
    T: Scalar,
    C: Chart<T>,
{
    tensors.check_mask(mask)?;
    tracing::debug!(
        chart = chart.name(),
        voxels = tensors.num_voxels(),
        masked = mask.count(),
        "converting tensors to manifold coordinates"
    );
    Ok(map_masked(tensors, mask, |d| chart.to_coordinates(d)))
}

/// Coordinates → tensor through an arbitrary chart.
pub fn from_manifold_with<T, C>(
    chart: &C,
    coordinates: &ManifoldField<T>,
    mask: &Mask,
) -> Result<TensorField<T>>
where
    T: Scalar,
    C: Chart<T>,
{
    coordinates.check_mask(mask)?;
    tracing::debug!(
        chart = chart.name(),
        voxels = coordinates.num_voxels(),
        masked = mask.count(),
        "converting manifold coordinates to tensors"
    );
    Ok(map_masked(coordinates, mask, |x| chart.to_tensor(x)))
}

/// Checked tensor → coordinates through an arbitrary chart.
pub fn try_to_manifold_with<T, C>(
    chart: &C,
    tensors: &TensorField<T>,
    mask: &Mask,
) -> Result<ManifoldField<T>>
where
    T: Scalar,
    C: Chart<T>,
{
    let coordinates = to_manifold_with(chart, tensors, mask)?;
    for (voxel, &selected) in mask.as_slice().iter().enumerate() {
        if !selected {
            continue;
        }
        if let Some(violation) = chart.find_pivot_violation(&coordinates.voxel(voxel)) {
            let value = violation.value.to_f64_lossy();
            tracing::warn!(
                voxel,
                pivot = violation.pivot,
                value,
                "tensor is not positive definite"
            );
            return Err(BeltramiError::not_positive_definite(
                voxel,
                violation.pivot,
                value,
            ));
        }
    }
    Ok(coordinates)
}

/// Checked coordinates → tensor through an arbitrary chart.
pub fn try_from_manifold_with<T, C>(
    chart: &C,
    coordinates: &ManifoldField<T>,
    mask: &Mask,
) -> Result<TensorField<T>>
where
    T: Scalar,
    C: Chart<T>,
{
    coordinates.check_mask(mask)?;
    for (voxel, &selected) in mask.as_slice().iter().enumerate() {
        if !selected {
            continue;
        }
        if let Some(violation) = chart.find_pivot_violation(&coordinates.voxel(voxel)) {
            tracing::warn!(
                voxel,
                pivot = violation.pivot,
                "manifold coordinates do not describe a positive definite tensor"
            );
            return Err(BeltramiError::invalid_coordinates(
                voxel,
                format!(
                    "pivot {} = {} is not positive",
                    violation.pivot,
                    violation.value.to_f64_lossy()
                ),
            ));
        }
    }
    from_manifold_with(chart, coordinates, mask)
}

/// Largest deviation of `tensors` from its own tensor → coordinates → tensor
/// round trip, over masked voxels.
///
/// For positive definite input this stays within
/// [`Scalar::ROUND_TRIP_TOLERANCE`].
pub fn max_round_trip_error<T: Scalar>(tensors: &TensorField<T>, mask: &Mask) -> Result<T> {
    let coordinates = to_manifold(tensors, mask)?;
    let restored = from_manifold(&coordinates, mask)?;
    max_relative_deviation(tensors, &restored, mask)
}

/// Applies `f` to every masked voxel of `input`, zero elsewhere.
fn map_masked<T, F>(input: &VoxelField<T>, mask: &Mask, f: F) -> VoxelField<T>
where
    T: Scalar,
    F: Fn(&Sym6<T>) -> Sym6<T> + Sync,
{
    let mut output = VoxelField::zeros(input.shape());
    let apply = |(out, (src, &selected)): (&mut [T], (&[T], &bool))| {
        if selected {
            let value = f(&Sym6::from_column_slice(src));
            out.copy_from_slice(value.as_slice());
        }
    };

    let config = get_parallel_config();
    if config.should_parallelize_voxels(input.num_voxels()) {
        output
            .as_mut_slice()
            .par_chunks_exact_mut(SYM6)
            .zip(
                input
                    .as_slice()
                    .par_chunks_exact(SYM6)
                    .zip(mask.as_slice().par_iter()),
            )
            .with_min_len(config.chunk_size(input.num_voxels()))
            .for_each(apply);
    } else {
        output
            .as_mut_slice()
            .chunks_exact_mut(SYM6)
            .zip(input.as_slice().chunks_exact(SYM6).zip(mask.as_slice()))
            .for_each(apply);
    }

    output
}
