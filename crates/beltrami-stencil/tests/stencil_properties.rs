//! Property tests for the finite-difference stencils.

use beltrami_core::{Axis, BeltramiError, Volume};
use beltrami_stencil::{backward_diff, forward_diff, shifted_difference, Stencil};
use proptest::prelude::*;

fn volume() -> impl Strategy<Value = Volume<f64>> {
    (1usize..6, 1usize..6, 1usize..6).prop_flat_map(|(nx, ny, nz)| {
        prop::collection::vec(-100.0f64..100.0, nx * ny * nz)
            .prop_map(move |data| Volume::from_vec([nx, ny, nz], data).unwrap())
    })
}

fn volume_pair() -> impl Strategy<Value = (Volume<f64>, Volume<f64>)> {
    (1usize..6, 1usize..6, 1usize..6).prop_flat_map(|(nx, ny, nz)| {
        let n = nx * ny * nz;
        (
            prop::collection::vec(-100.0f64..100.0, n),
            prop::collection::vec(-100.0f64..100.0, n),
        )
            .prop_map(move |(f, g)| {
                (
                    Volume::from_vec([nx, ny, nz], f).unwrap(),
                    Volume::from_vec([nx, ny, nz], g).unwrap(),
                )
            })
    })
}

fn axis() -> impl Strategy<Value = Axis> {
    (0usize..3).prop_map(|a| Axis::try_from(a).unwrap())
}

fn stencil() -> impl Strategy<Value = Stencil> {
    prop_oneof![Just(Stencil::Forward), Just(Stencil::Backward)]
}

/// Indices `[i, j, k]` whose coordinate along `axis` equals `at`.
fn boundary_plane(shape: [usize; 3], axis: Axis, at: usize) -> Vec<[usize; 3]> {
    let mut out = Vec::new();
    for i in 0..shape[0] {
        for j in 0..shape[1] {
            for k in 0..shape[2] {
                let idx = [i, j, k];
                if idx[axis.index()] == at {
                    out.push(idx);
                }
            }
        }
    }
    out
}

proptest! {
    #[test]
    fn prop_linearity(
        (f, g) in volume_pair(),
        a in -10.0f64..10.0,
        b in -10.0f64..10.0,
        axis in axis(),
        stencil in stencil(),
        h in 0.1f64..4.0,
    ) {
        let combo = f.zip_map(&g, |x, y| a * x + b * y).unwrap();
        let lhs = shifted_difference(&combo, axis, h, stencil);
        let rhs = shifted_difference(&f, axis, h, stencil)
            .zip_map(&shifted_difference(&g, axis, h, stencil), |x, y| a * x + b * y)
            .unwrap();

        for (l, r) in lhs.as_slice().iter().zip(rhs.as_slice()) {
            prop_assert!((l - r).abs() <= 1e-9 * l.abs().max(r.abs()).max(1.0), "{} vs {}", l, r);
        }
    }

    #[test]
    fn prop_boundary_is_exactly_zero(f in volume(), axis in axis(), h in 0.1f64..4.0) {
        let shape = f.shape();
        let last = shape[axis.index()] - 1;

        let fwd = forward_diff(&f, axis, h);
        for idx in boundary_plane(shape, axis, last) {
            prop_assert_eq!(fwd[idx], 0.0);
        }

        let bwd = backward_diff(&f, axis, h);
        for idx in boundary_plane(shape, axis, 0) {
            prop_assert_eq!(bwd[idx], 0.0);
        }
    }

    #[test]
    fn prop_constant_field_has_zero_gradient(
        shape in (1usize..6, 1usize..6, 1usize..6),
        value in -1e6f64..1e6,
        axis in axis(),
        h in 0.1f64..4.0,
    ) {
        let f = Volume::from_elem([shape.0, shape.1, shape.2], value);
        prop_assert!(forward_diff(&f, axis, h).as_slice().iter().all(|&g| g == 0.0));
        prop_assert!(backward_diff(&f, axis, h).as_slice().iter().all(|&g| g == 0.0));
    }

    #[test]
    fn prop_backward_is_shifted_forward(f in volume(), axis in axis(), h in 0.1f64..4.0) {
        // Away from the boundaries, backward[i + 1] == forward[i].
        let fwd = forward_diff(&f, axis, h);
        let bwd = backward_diff(&f, axis, h);
        let shape = f.shape();
        for i in 0..shape[0] {
            for j in 0..shape[1] {
                for k in 0..shape[2] {
                    let idx = [i, j, k];
                    let mut next = idx;
                    next[axis.index()] += 1;
                    if next[axis.index()] < shape[axis.index()] {
                        prop_assert_eq!(bwd[next], fwd[idx]);
                    }
                }
            }
        }
    }
}

#[test]
fn test_axis_selector_is_rejected() {
    for bad in [3usize, 4, usize::MAX] {
        assert!(matches!(
            Axis::try_from(bad),
            Err(BeltramiError::InvalidAxis { axis }) if axis == bad
        ));
    }
}

#[test]
fn test_large_volume_matches_line_by_line() {
    // Default thresholds; the forced rayon path is covered in parallel_path.rs.
    let shape = [48, 40, 36];
    let f = Volume::from_fn(shape, |[i, j, k]| ((i * 7 + j * 13 + k * 29) % 17) as f64);

    for axis in Axis::ALL {
        let grad = forward_diff(&f, axis, 0.5);
        for i in 0..shape[0] {
            for j in 0..shape[1] {
                for k in 0..shape[2] {
                    let idx = [i, j, k];
                    let mut next = idx;
                    next[axis.index()] = (idx[axis.index()] + 1).min(shape[axis.index()] - 1);
                    assert_eq!(grad[idx], (f[next] - f[idx]) / 0.5);
                }
            }
        }
    }
}
