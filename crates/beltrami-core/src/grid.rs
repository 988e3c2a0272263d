//! Dense voxel-grid containers.
//!
//! All containers are flat, row-major (C order) buffers: the last spatial
//! axis varies fastest. A [`VoxelField`] additionally carries a trailing
//! channel axis of length six, so the six values of one voxel are contiguous,
//! exactly like an `(..., 6)` array.

use crate::error::{BeltramiError, Result};
use crate::types::{Scalar, Sym6, SYM6};
use std::ops::{Index, IndexMut};

/// Spatial axis selector for the finite-difference operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// First spatial dimension (slowest varying).
    X,
    /// Second spatial dimension.
    Y,
    /// Third spatial dimension (fastest varying).
    Z,
}

impl Axis {
    /// All three axes in storage order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Dimension index of this axis.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl TryFrom<usize> for Axis {
    type Error = BeltramiError;

    fn try_from(axis: usize) -> Result<Self> {
        match axis {
            0 => Ok(Axis::X),
            1 => Ok(Axis::Y),
            2 => Ok(Axis::Z),
            _ => Err(BeltramiError::invalid_axis(axis)),
        }
    }
}

impl From<Axis> for usize {
    fn from(axis: Axis) -> usize {
        axis.index()
    }
}

/// Physical voxel spacing along each axis.
///
/// Spacing is only ever used as a divisor; no unit handling is involved.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "VoxelSizeRepr<T>",
        bound(deserialize = "T: Scalar + serde::Deserialize<'de>")
    )
)]
pub struct VoxelSize<T> {
    spacing: [T; 3],
}

impl<T: Scalar> VoxelSize<T> {
    /// Creates a voxel size, rejecting spacing that is not positive and finite.
    pub fn new(x: T, y: T, z: T) -> Result<Self> {
        let spacing = [x, y, z];
        for (axis, &h) in spacing.iter().enumerate() {
            if !(h > T::zero() && <T as num_traits::Float>::is_finite(h)) {
                return Err(BeltramiError::invalid_voxel_size(axis, h.to_f64_lossy()));
            }
        }
        Ok(Self { spacing })
    }

    /// Same spacing along all three axes.
    pub fn isotropic(h: T) -> Result<Self> {
        Self::new(h, h, h)
    }

    /// Spacing along `axis`.
    pub fn along(&self, axis: Axis) -> T {
        self.spacing[axis.index()]
    }

    /// Spacing as `[x, y, z]`.
    pub fn as_array(&self) -> [T; 3] {
        self.spacing
    }
}

/// Row-major strides of a 3D shape.
pub fn strides(shape: [usize; 3]) -> [usize; 3] {
    [shape[1] * shape[2], shape[2], 1]
}

/// A 3D scalar volume, e.g. one manifold coordinate channel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "VolumeRepr<T>",
        bound(deserialize = "T: Scalar + serde::Deserialize<'de>")
    )
)]
pub struct Volume<T> {
    shape: [usize; 3],
    data: Vec<T>,
}

impl<T: Scalar> Volume<T> {
    /// Creates a zero-filled volume.
    pub fn zeros(shape: [usize; 3]) -> Self {
        Self::from_elem(shape, T::zero())
    }

    /// Creates a volume filled with `value`.
    pub fn from_elem(shape: [usize; 3], value: T) -> Self {
        Self {
            shape,
            data: vec![value; shape.iter().product()],
        }
    }

    /// Wraps a row-major buffer, checking its length against `shape`.
    pub fn from_vec(shape: [usize; 3], data: Vec<T>) -> Result<Self> {
        let expected = shape.iter().product::<usize>();
        if data.len() != expected {
            return Err(BeltramiError::dimension_mismatch(
                format!("{} values for shape {:?}", expected, shape),
                format!("{} values", data.len()),
            ));
        }
        Ok(Self { shape, data })
    }

    /// Builds a volume by evaluating `f` at every `[i, j, k]`.
    pub fn from_fn<F>(shape: [usize; 3], mut f: F) -> Self
    where
        F: FnMut([usize; 3]) -> T,
    {
        let mut data = Vec::with_capacity(shape.iter().product());
        for i in 0..shape[0] {
            for j in 0..shape[1] {
                for k in 0..shape[2] {
                    data.push(f([i, j, k]));
                }
            }
        }
        Self { shape, data }
    }

    /// Applies `f` element-wise.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(T) -> T,
    {
        Self {
            shape: self.shape,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Combines two volumes of identical shape element-wise.
    pub fn zip_map<F>(&self, other: &Self, f: F) -> Result<Self>
    where
        F: Fn(T, T) -> T,
    {
        if self.shape != other.shape {
            return Err(BeltramiError::dimension_mismatch(
                format!("{:?}", self.shape),
                format!("{:?}", other.shape),
            ));
        }
        Ok(Self {
            shape: self.shape,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }
}

impl<T> Volume<T> {
    /// Shape `[nx, ny, nz]`.
    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    /// Number of voxels.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the volume holds no voxels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat index of `[i, j, k]`.
    #[inline]
    pub fn flat_index(&self, index: [usize; 3]) -> usize {
        let s = strides(self.shape);
        index[0] * s[0] + index[1] * s[1] + index[2] * s[2]
    }

    /// Row-major data.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable row-major data.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the volume, returning its buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T> Index<[usize; 3]> for Volume<T> {
    type Output = T;

    fn index(&self, index: [usize; 3]) -> &T {
        &self.data[self.flat_index(index)]
    }
}

impl<T> IndexMut<[usize; 3]> for Volume<T> {
    fn index_mut(&mut self, index: [usize; 3]) -> &mut T {
        let idx = self.flat_index(index);
        &mut self.data[idx]
    }
}

/// Boolean voxel selection with an arbitrary spatial shape.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "MaskRepr"))]
pub struct Mask {
    shape: Vec<usize>,
    data: Vec<bool>,
}

impl Mask {
    /// Wraps a row-major buffer, checking its length against `shape`.
    pub fn new(shape: &[usize], data: Vec<bool>) -> Result<Self> {
        let expected = shape.iter().product::<usize>();
        if data.len() != expected {
            return Err(BeltramiError::dimension_mismatch(
                format!("{} mask entries for shape {:?}", expected, shape),
                format!("{} entries", data.len()),
            ));
        }
        Ok(Self {
            shape: shape.to_vec(),
            data,
        })
    }

    /// A mask with every voxel set to `value`.
    pub fn full(shape: &[usize], value: bool) -> Self {
        Self {
            shape: shape.to_vec(),
            data: vec![value; shape.iter().product()],
        }
    }

    /// Spatial shape.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of voxels covered by the mask.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the mask covers no voxels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of selected voxels.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&m| m).count()
    }

    /// Row-major selection flags.
    pub fn as_slice(&self) -> &[bool] {
        &self.data
    }
}

/// A six-channel field over a voxel grid.
///
/// Holds either packed diffusion tensors or manifold coordinates; see the
/// [`TensorField`] and [`ManifoldField`] aliases.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "VoxelFieldRepr<T>",
        bound(deserialize = "T: Scalar + serde::Deserialize<'de>")
    )
)]
pub struct VoxelField<T> {
    shape: Vec<usize>,
    data: Vec<T>,
}

/// Field of packed tensors `(Dxx, Dxy, Dyy, Dxz, Dyz, Dzz)`.
pub type TensorField<T> = VoxelField<T>;

/// Field of Iwasawa coordinates `(X1, X2, X3, X4, X5, X6)`.
pub type ManifoldField<T> = VoxelField<T>;

impl<T: Scalar> VoxelField<T> {
    /// Creates a zero-filled field over `shape`.
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            shape: shape.to_vec(),
            data: vec![T::zero(); shape.iter().product::<usize>() * SYM6],
        }
    }

    /// Wraps a row-major `(..., 6)` buffer.
    pub fn from_vec(shape: &[usize], data: Vec<T>) -> Result<Self> {
        let expected = shape.iter().product::<usize>() * SYM6;
        if data.len() != expected {
            return Err(BeltramiError::dimension_mismatch(
                format!("{} values for shape {:?} x {}", expected, shape, SYM6),
                format!("{} values", data.len()),
            ));
        }
        Ok(Self {
            shape: shape.to_vec(),
            data,
        })
    }

    /// Builds a field from one packed vector per voxel.
    pub fn from_voxels(shape: &[usize], voxels: &[Sym6<T>]) -> Result<Self> {
        let data = voxels.iter().flat_map(|v| v.iter().copied()).collect();
        Self::from_vec(shape, data)
    }

    /// Packed vector of voxel `voxel` (flat spatial index).
    pub fn voxel(&self, voxel: usize) -> Sym6<T> {
        Sym6::from_column_slice(&self.data[voxel * SYM6..(voxel + 1) * SYM6])
    }

    /// Overwrites voxel `voxel` (flat spatial index).
    pub fn set_voxel(&mut self, voxel: usize, value: &Sym6<T>) {
        self.data[voxel * SYM6..(voxel + 1) * SYM6].copy_from_slice(value.as_slice());
    }

    /// Spatial shape as a 3D grid, failing for any other dimensionality.
    pub fn grid_shape(&self) -> Result<[usize; 3]> {
        match self.shape[..] {
            [nx, ny, nz] => Ok([nx, ny, nz]),
            _ => Err(BeltramiError::dimension_mismatch(
                "3 spatial dimensions",
                format!("{} spatial dimensions", self.shape.len()),
            )),
        }
    }

    /// Copies channel `c` of a 3D field into a [`Volume`].
    pub fn channel(&self, c: usize) -> Result<Volume<T>> {
        let shape = self.grid_shape()?;
        check_channel(c)?;
        Volume::from_vec(
            shape,
            self.data.iter().skip(c).step_by(SYM6).copied().collect(),
        )
    }

    /// Overwrites channel `c` of a 3D field with `values`.
    pub fn set_channel(&mut self, c: usize, values: &Volume<T>) -> Result<()> {
        let shape = self.grid_shape()?;
        check_channel(c)?;
        if values.shape() != shape {
            return Err(BeltramiError::dimension_mismatch(
                format!("{:?}", shape),
                format!("{:?}", values.shape()),
            ));
        }
        for (dst, &src) in self
            .data
            .iter_mut()
            .skip(c)
            .step_by(SYM6)
            .zip(values.as_slice())
        {
            *dst = src;
        }
        Ok(())
    }

    /// Assembles a 3D field from six channel volumes.
    pub fn from_channels(channels: &[Volume<T>; SYM6]) -> Result<Self> {
        let shape = channels[0].shape();
        let mut field = Self::zeros(&shape);
        for (c, volume) in channels.iter().enumerate() {
            field.set_channel(c, volume)?;
        }
        Ok(field)
    }
}

impl<T> VoxelField<T> {
    /// Spatial shape (without the channel axis).
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of voxels.
    pub fn num_voxels(&self) -> usize {
        self.data.len() / SYM6
    }

    /// Row-major `(..., 6)` data.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable row-major `(..., 6)` data.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the field, returning its buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Fails unless `mask` has exactly this field's spatial shape.
    pub fn check_mask(&self, mask: &Mask) -> Result<()> {
        if mask.shape() != self.shape.as_slice() {
            return Err(BeltramiError::dimension_mismatch(
                format!("mask shape {:?}", self.shape),
                format!("{:?}", mask.shape()),
            ));
        }
        Ok(())
    }
}

// Deserialization goes through the validating constructors so that a
// decoded container always has a buffer matching its shape.

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct VoxelSizeRepr<T> {
    spacing: [T; 3],
}

#[cfg(feature = "serde")]
impl<T: Scalar> TryFrom<VoxelSizeRepr<T>> for VoxelSize<T> {
    type Error = BeltramiError;

    fn try_from(repr: VoxelSizeRepr<T>) -> Result<Self> {
        let [x, y, z] = repr.spacing;
        Self::new(x, y, z)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct VolumeRepr<T> {
    shape: [usize; 3],
    data: Vec<T>,
}

#[cfg(feature = "serde")]
impl<T: Scalar> TryFrom<VolumeRepr<T>> for Volume<T> {
    type Error = BeltramiError;

    fn try_from(repr: VolumeRepr<T>) -> Result<Self> {
        Self::from_vec(repr.shape, repr.data)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct MaskRepr {
    shape: Vec<usize>,
    data: Vec<bool>,
}

#[cfg(feature = "serde")]
impl TryFrom<MaskRepr> for Mask {
    type Error = BeltramiError;

    fn try_from(repr: MaskRepr) -> Result<Self> {
        Self::new(&repr.shape, repr.data)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct VoxelFieldRepr<T> {
    shape: Vec<usize>,
    data: Vec<T>,
}

#[cfg(feature = "serde")]
impl<T: Scalar> TryFrom<VoxelFieldRepr<T>> for VoxelField<T> {
    type Error = BeltramiError;

    fn try_from(repr: VoxelFieldRepr<T>) -> Result<Self> {
        Self::from_vec(&repr.shape, repr.data)
    }
}

fn check_channel(c: usize) -> Result<()> {
    if c >= SYM6 {
        return Err(BeltramiError::dimension_mismatch(
            format!("channel index below {}", SYM6),
            c,
        ));
    }
    Ok(())
}
