//! Gradient and divergence assembly over six-channel coordinate fields.
//!
//! A regularization term needs the spatial derivative of every manifold
//! coordinate along every axis. [`field_gradient`] applies one stencil to
//! each of the six channels along each of the three axes; [`divergence`]
//! folds a three-component gradient back into a scalar volume with the
//! backward stencil, so `divergence(forward gradient)` is the usual
//! seven-point Laplacian in the interior.

use crate::difference::{backward_diff, shifted_difference, Stencil};
use beltrami_core::{
    error::{BeltramiError, Result},
    grid::{Axis, Volume, VoxelField, VoxelSize},
    types::{Scalar, SYM6},
};

/// Spatial derivatives of a six-channel field, one field per axis.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldGradient<T> {
    components: [VoxelField<T>; 3],
}

impl<T> FieldGradient<T> {
    /// Derivative of every channel along `axis`.
    pub fn along(&self, axis: Axis) -> &VoxelField<T> {
        &self.components[axis.index()]
    }

    /// Consumes the gradient, returning the `[x, y, z]` components.
    pub fn into_components(self) -> [VoxelField<T>; 3] {
        self.components
    }
}

/// Gradient of a scalar volume: one stencil applied along each axis.
pub fn volume_gradient<T: Scalar>(
    field: &Volume<T>,
    voxel_size: &VoxelSize<T>,
    stencil: Stencil,
) -> [Volume<T>; 3] {
    Axis::ALL.map(|axis| shifted_difference(field, axis, voxel_size.along(axis), stencil))
}

/// Gradient of every channel of a 3D six-channel field.
///
/// Fails if the field does not have exactly three spatial dimensions.
pub fn field_gradient<T: Scalar>(
    field: &VoxelField<T>,
    voxel_size: &VoxelSize<T>,
    stencil: Stencil,
) -> Result<FieldGradient<T>> {
    let shape = field.grid_shape()?;
    tracing::debug!(
        ?shape,
        ?stencil,
        spacing = ?voxel_size.as_array().map(|h| h.to_f64_lossy()),
        "assembling field gradient"
    );

    let mut components = [
        VoxelField::zeros(&shape),
        VoxelField::zeros(&shape),
        VoxelField::zeros(&shape),
    ];
    for c in 0..SYM6 {
        let channel = field.channel(c)?;
        for (axis, component) in Axis::ALL.into_iter().zip(components.iter_mut()) {
            let derivative = shifted_difference(&channel, axis, voxel_size.along(axis), stencil);
            component.set_channel(c, &derivative)?;
        }
    }

    Ok(FieldGradient { components })
}

/// Backward-difference divergence `∂x gx + ∂y gy + ∂z gz`.
///
/// Uses the boundary policy of [`backward_diff`]: the first sample along
/// each axis contributes zero.
pub fn divergence<T: Scalar>(
    gx: &Volume<T>,
    gy: &Volume<T>,
    gz: &Volume<T>,
    voxel_size: &VoxelSize<T>,
) -> Result<Volume<T>> {
    for g in [gy, gz] {
        if g.shape() != gx.shape() {
            return Err(BeltramiError::dimension_mismatch(
                format!("{:?}", gx.shape()),
                format!("{:?}", g.shape()),
            ));
        }
    }

    let dx = backward_diff(gx, Axis::X, voxel_size.along(Axis::X));
    let dy = backward_diff(gy, Axis::Y, voxel_size.along(Axis::Y));
    let dz = backward_diff(gz, Axis::Z, voxel_size.along(Axis::Z));

    dx.zip_map(&dy, |a, b| a + b)?.zip_map(&dz, |a, b| a + b)
}

/// Channel-wise [`divergence`] of a field gradient.
pub fn field_divergence<T: Scalar>(
    gradient: &FieldGradient<T>,
    voxel_size: &VoxelSize<T>,
) -> Result<VoxelField<T>> {
    let shape = gradient.along(Axis::X).grid_shape()?;
    let mut out = VoxelField::zeros(&shape);
    for c in 0..SYM6 {
        let div = divergence(
            &gradient.along(Axis::X).channel(c)?,
            &gradient.along(Axis::Y).channel(c)?,
            &gradient.along(Axis::Z).channel(c)?,
            voxel_size,
        )?;
        out.set_channel(c, &div)?;
    }
    Ok(out)
}
