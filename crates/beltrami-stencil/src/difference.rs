//! First-order finite differences along one axis of a 3D volume.
//!
//! Both stencils clamp the out-of-range neighbor to the boundary sample
//! itself, so the difference there is exactly zero (a zero-gradient,
//! Neumann-style boundary):
//!
//! ```text
//! forward:   g[i] = (f[i+1] − f[i]) / h     g[N−1] = 0
//! backward:  g[i] = (f[i] − f[i−1]) / h     g[0]   = 0
//! ```
//!
//! Every line along the chosen axis is processed independently and
//! identically; the other two axes are plain broadcast dimensions.

use beltrami_core::{
    config::get_parallel_config,
    grid::{strides, Axis, Volume},
    types::Scalar,
};
use rayon::prelude::*;

/// Which neighbor a difference is taken against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stencil {
    /// `f[i+1] − f[i]`
    Forward,
    /// `f[i] − f[i−1]`
    Backward,
}

impl Stencil {
    /// Flat index of the neighbor of `idx`, clamped at the boundary.
    ///
    /// `coord` is the position of `idx` along the axis, `n` the axis length
    /// and `stride` the flat distance between neighbors along it.
    #[inline]
    fn neighbor(self, idx: usize, coord: usize, n: usize, stride: usize) -> usize {
        match self {
            Stencil::Forward if coord + 1 < n => idx + stride,
            Stencil::Backward if coord > 0 => idx - stride,
            _ => idx,
        }
    }

    /// Oriented difference between a sample and its neighbor.
    #[inline]
    fn difference<T: Scalar>(self, center: T, neighbor: T) -> T {
        match self {
            Stencil::Forward => neighbor - center,
            Stencil::Backward => center - neighbor,
        }
    }
}

/// Difference of `field` with its shifted neighbor along `axis`, divided by
/// `voxel_size`.
///
/// `voxel_size` must be positive; it is not checked here (see
/// [`VoxelSize`](beltrami_core::VoxelSize) for a validated spacing).
pub fn shifted_difference<T: Scalar>(
    field: &Volume<T>,
    axis: Axis,
    voxel_size: T,
    stencil: Stencil,
) -> Volume<T> {
    let shape = field.shape();
    let n = shape[axis.index()];
    let stride = strides(shape)[axis.index()];
    let src = field.as_slice();

    let sample = |idx: usize| -> T {
        let coord = (idx / stride) % n;
        let nb = stencil.neighbor(idx, coord, n, stride);
        stencil.difference(src[idx], src[nb]) / voxel_size
    };

    let mut grad = Volume::zeros(shape);
    let config = get_parallel_config();
    if config.should_parallelize_stencil(field.len()) {
        grad.as_mut_slice()
            .par_iter_mut()
            .with_min_len(config.min_chunk_size)
            .enumerate()
            .for_each(|(idx, g)| *g = sample(idx));
    } else {
        grad.as_mut_slice()
            .iter_mut()
            .enumerate()
            .for_each(|(idx, g)| *g = sample(idx));
    }
    grad
}

/// Forward difference `(f[i+1] − f[i]) / h` along `axis`, zero at the last index.
pub fn forward_diff<T: Scalar>(field: &Volume<T>, axis: Axis, voxel_size: T) -> Volume<T> {
    shifted_difference(field, axis, voxel_size, Stencil::Forward)
}

/// Backward difference `(f[i] − f[i−1]) / h` along `axis`, zero at the first index.
pub fn backward_diff<T: Scalar>(field: &Volume<T>, axis: Axis, voxel_size: T) -> Volume<T> {
    shifted_difference(field, axis, voxel_size, Stencil::Backward)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn line(values: &[f64], axis: Axis) -> Volume<f64> {
        let mut shape = [1, 1, 1];
        shape[axis.index()] = values.len();
        Volume::from_vec(shape, values.to_vec()).unwrap()
    }

    #[test]
    fn test_reference_line_all_axes() {
        for axis in Axis::ALL {
            let f = line(&[1.0, 2.0, 4.0, 7.0], axis);
            assert_eq!(forward_diff(&f, axis, 1.0).into_vec(), vec![1.0, 2.0, 3.0, 0.0]);
            assert_eq!(backward_diff(&f, axis, 1.0).into_vec(), vec![0.0, 1.0, 2.0, 3.0]);
        }
    }

    #[test]
    fn test_voxel_size_normalizes_whole_difference() {
        for axis in Axis::ALL {
            let f = line(&[1.0, 2.0, 4.0, 7.0], axis);
            assert_eq!(forward_diff(&f, axis, 2.0).into_vec(), vec![0.5, 1.0, 1.5, 0.0]);
            assert_eq!(backward_diff(&f, axis, 2.0).into_vec(), vec![0.0, 0.5, 1.0, 1.5]);
        }
    }

    #[test]
    fn test_other_axes_are_broadcast() {
        let f = Volume::from_fn([3, 4, 5], |[i, j, k]| (i * i + 10 * j + 100 * k * k) as f64);

        let gy = forward_diff(&f, Axis::Y, 1.0);
        for i in 0..3 {
            for k in 0..5 {
                assert_eq!(gy[[i, 0, k]], 10.0);
                assert_eq!(gy[[i, 2, k]], 10.0);
                assert_eq!(gy[[i, 3, k]], 0.0);
            }
        }

        let gx = backward_diff(&f, Axis::X, 1.0);
        for j in 0..4 {
            for k in 0..5 {
                assert_eq!(gx[[0, j, k]], 0.0);
                assert_eq!(gx[[1, j, k]], 1.0);
                assert_eq!(gx[[2, j, k]], 3.0);
            }
        }

        let gz = backward_diff(&f, Axis::Z, 0.5);
        assert_eq!(gz[[1, 1, 0]], 0.0);
        assert_eq!(gz[[1, 1, 3]], 1000.0);
    }

    #[test]
    fn test_single_sample_axis_is_zero() {
        let f = Volume::from_fn([4, 1, 3], |[i, _, k]| (i + k) as f64);
        assert_eq!(forward_diff(&f, Axis::Y, 1.0), Volume::zeros([4, 1, 3]));
        assert_eq!(backward_diff(&f, Axis::Y, 1.0), Volume::zeros([4, 1, 3]));
    }

    #[test]
    fn test_empty_volume() {
        let f = Volume::<f64>::zeros([0, 3, 3]);
        assert!(forward_diff(&f, Axis::X, 1.0).is_empty());
        assert!(backward_diff(&f, Axis::Z, 1.0).is_empty());
    }

    #[test]
    fn test_stencil_neighbors() {
        assert_eq!(Stencil::Forward.neighbor(5, 0, 3, 5), 10);
        assert_eq!(Stencil::Forward.neighbor(10, 2, 3, 5), 10);
        assert_eq!(Stencil::Backward.neighbor(5, 1, 3, 5), 0);
        assert_eq!(Stencil::Backward.neighbor(0, 0, 3, 5), 0);
    }
}
