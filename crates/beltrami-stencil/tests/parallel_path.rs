//! Stencils with the rayon path forced on for every input size.
//!
//! The global thresholds can only be set once per process, so this file
//! runs as its own test binary and every test installs the same config.

use beltrami_core::{
    config::{get_parallel_config, set_parallel_config, ParallelThresholdsBuilder},
    Axis, Volume, VoxelField, VoxelSize,
};
use beltrami_stencil::{backward_diff, field_gradient, forward_diff, Stencil};
use rand::{rngs::SmallRng, Rng, SeedableRng};

fn force_parallel() {
    let config = ParallelThresholdsBuilder::new()
        .voxel_threshold(0)
        .stencil_threshold(0)
        .num_threads(2)
        .min_chunk_size(7)
        .build();
    // Another test in this binary may have won the race; the config is the same.
    let _ = set_parallel_config(config.clone());
    assert_eq!(get_parallel_config(), &config);
}

fn random_volume(shape: [usize; 3], seed: u64) -> Volume<f64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    Volume::from_fn(shape, |_| rng.gen_range(-10.0..10.0))
}

/// Line-by-line reference with the clamped neighbor.
fn reference(f: &Volume<f64>, axis: Axis, h: f64, stencil: Stencil) -> Volume<f64> {
    let shape = f.shape();
    let a = axis.index();
    let mut out = Volume::zeros(shape);
    for i in 0..shape[0] {
        for j in 0..shape[1] {
            for k in 0..shape[2] {
                let idx = [i, j, k];
                let mut nb = idx;
                out[idx] = match stencil {
                    Stencil::Forward => {
                        nb[a] = (idx[a] + 1).min(shape[a] - 1);
                        (f[nb] - f[idx]) / h
                    }
                    Stencil::Backward => {
                        nb[a] = idx[a].saturating_sub(1);
                        (f[idx] - f[nb]) / h
                    }
                };
            }
        }
    }
    out
}

#[test]
fn test_parallel_stencils_match_reference() {
    force_parallel();
    let shape = [9, 8, 7];
    assert!(get_parallel_config().should_parallelize_stencil(504));

    let f = random_volume(shape, 3);
    for axis in Axis::ALL {
        assert_eq!(forward_diff(&f, axis, 0.7), reference(&f, axis, 0.7, Stencil::Forward));
        assert_eq!(backward_diff(&f, axis, 0.7), reference(&f, axis, 0.7, Stencil::Backward));
    }
}

#[test]
fn test_parallel_field_gradient_matches_reference() {
    force_parallel();
    let shape = [5, 6, 4];
    let channels: [Volume<f64>; 6] = std::array::from_fn(|c| random_volume(shape, c as u64));
    let field = VoxelField::from_channels(&channels).unwrap();
    let vs = VoxelSize::new(1.0, 2.0, 2.5).unwrap();

    let grad = field_gradient(&field, &vs, Stencil::Backward).unwrap();
    for (c, channel) in channels.iter().enumerate() {
        for axis in Axis::ALL {
            assert_eq!(
                grad.along(axis).channel(c).unwrap(),
                reference(channel, axis, vs.along(axis), Stencil::Backward)
            );
        }
    }
}
