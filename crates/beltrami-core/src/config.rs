//! Thresholds for switching voxel-wise operators to parallel execution.
//!
//! Every operator in this workspace is a pure map over voxels or grid
//! lines, so sharding needs no synchronization. Small grids are still
//! cheaper to process on the calling thread; the thresholds below decide
//! where that crossover lies. Both paths give bit-identical results.

use std::sync::OnceLock;

/// Global configuration for parallel thresholds
static GLOBAL_CONFIG: OnceLock<ParallelThresholdsConfig> = OnceLock::new();

/// Configuration for parallel execution thresholds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelThresholdsConfig {
    /// Minimum voxel count before a field conversion runs in parallel
    pub voxel_threshold: usize,

    /// Minimum voxel count before a stencil runs in parallel
    pub stencil_threshold: usize,

    /// Number of available threads (cached)
    pub num_threads: usize,

    /// Minimum number of voxels handed to one rayon task
    pub min_chunk_size: usize,
}

impl Default for ParallelThresholdsConfig {
    fn default() -> Self {
        let num_threads = rayon::current_num_threads();

        // A conversion does ~20 flops per voxel, a stencil ~2 per voxel.
        let base_voxel = 4_096;
        let base_stencil = 32_768;

        // More threads = higher overhead = need larger problems
        let thread_scaling = (num_threads as f64).sqrt();

        Self {
            voxel_threshold: (base_voxel as f64 * thread_scaling) as usize,
            stencil_threshold: (base_stencil as f64 * thread_scaling) as usize,
            num_threads,
            min_chunk_size: 1024,
        }
    }
}

impl ParallelThresholdsConfig {
    /// A configuration that never parallelizes.
    pub fn sequential() -> Self {
        Self {
            voxel_threshold: usize::MAX,
            stencil_threshold: usize::MAX,
            num_threads: 1,
            min_chunk_size: usize::MAX,
        }
    }

    /// Should a per-voxel conversion over `voxels` voxels run in parallel?
    pub fn should_parallelize_voxels(&self, voxels: usize) -> bool {
        cfg!(feature = "parallel") && self.num_threads > 1 && voxels >= self.voxel_threshold
    }

    /// Should a stencil over `voxels` voxels run in parallel?
    pub fn should_parallelize_stencil(&self, voxels: usize) -> bool {
        cfg!(feature = "parallel") && self.num_threads > 1 && voxels >= self.stencil_threshold
    }

    /// Chunk length for splitting `total` voxels across the pool.
    pub fn chunk_size(&self, total: usize) -> usize {
        // Some oversubscription for load balancing
        let ideal_chunks = self.num_threads.max(1) * 4;
        total.div_ceil(ideal_chunks).max(self.min_chunk_size).max(1)
    }
}

/// Builder for customizing parallel thresholds
#[derive(Debug, Default)]
pub struct ParallelThresholdsBuilder {
    config: ParallelThresholdsConfig,
}

impl ParallelThresholdsBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the field conversion threshold
    pub fn voxel_threshold(mut self, threshold: usize) -> Self {
        self.config.voxel_threshold = threshold;
        self
    }

    /// Set the stencil threshold
    pub fn stencil_threshold(mut self, threshold: usize) -> Self {
        self.config.stencil_threshold = threshold;
        self
    }

    /// Set the thread count the thresholds assume
    pub fn num_threads(mut self, threads: usize) -> Self {
        self.config.num_threads = threads;
        self
    }

    /// Set the minimum chunk size
    pub fn min_chunk_size(mut self, size: usize) -> Self {
        self.config.min_chunk_size = size;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ParallelThresholdsConfig {
        self.config
    }
}

/// Get the global parallel thresholds configuration
pub fn get_parallel_config() -> &'static ParallelThresholdsConfig {
    GLOBAL_CONFIG.get_or_init(ParallelThresholdsConfig::default)
}

/// Set custom parallel thresholds configuration.
///
/// Fails (returning the rejected config) once the global has been read or set.
pub fn set_parallel_config(
    config: ParallelThresholdsConfig,
) -> Result<(), ParallelThresholdsConfig> {
    GLOBAL_CONFIG.set(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = ParallelThresholdsConfig::default();

        assert!(!config.should_parallelize_voxels(64));
        assert!(!config.should_parallelize_stencil(1_000));
        if config.num_threads > 1 {
            assert!(config.should_parallelize_voxels(10_000_000));
            assert!(config.should_parallelize_stencil(10_000_000));
        }
    }

    #[test]
    fn test_sequential_config() {
        let config = ParallelThresholdsConfig::sequential();
        assert!(!config.should_parallelize_voxels(usize::MAX - 1));
        assert!(!config.should_parallelize_stencil(usize::MAX - 1));
    }

    #[test]
    fn test_chunk_size_calculation() {
        let config = ParallelThresholdsConfig::default();

        assert_eq!(config.chunk_size(100), config.min_chunk_size);

        let chunk = config.chunk_size(10_000_000);
        assert!(chunk >= config.min_chunk_size);
        assert!(chunk < 10_000_000);
    }

    #[test]
    fn test_builder() {
        let config = ParallelThresholdsBuilder::new()
            .voxel_threshold(10)
            .stencil_threshold(20)
            .num_threads(2)
            .min_chunk_size(4)
            .build();

        assert_eq!(config.voxel_threshold, 10);
        assert_eq!(config.num_threads, 2);
        assert_eq!(config.stencil_threshold, 20);
        assert_eq!(config.min_chunk_size, 4);
        assert!(config.should_parallelize_voxels(10) || !cfg!(feature = "parallel"));
        assert!(!config.should_parallelize_stencil(19));
    }
}
