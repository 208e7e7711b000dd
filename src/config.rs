//! Visualizer Configuration
//!
//! Settings behind the visualizer's controls. Setters clamp to the slider
//! bounds, so every stored value is valid by construction.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::algorithm::Algorithm;

/// Smallest array the size slider allows.
pub const MIN_SIZE: usize = 5;
/// Largest array the size slider allows.
pub const MAX_SIZE: usize = 50;
/// Array size on first load.
pub const DEFAULT_SIZE: usize = 20;

pub const MIN_SPEED: u32 = 1;
pub const MAX_SPEED: u32 = 100;
pub const DEFAULT_SPEED: u32 = 50;

/// Inclusive range of generated bar heights.
pub const MIN_VALUE: u32 = 5;
pub const MAX_VALUE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualizerConfig {
    algorithm: Algorithm,
    size: usize,
    speed: u32,
    /// Seed for array generation; `None` draws from OS entropy.
    seed: Option<u64>,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        VisualizerConfig {
            algorithm: Algorithm::default(),
            size: DEFAULT_SIZE,
            speed: DEFAULT_SPEED,
            seed: None,
        }
    }
}

impl VisualizerConfig {
    pub fn new(algorithm: Algorithm, size: usize, speed: u32) -> Self {
        VisualizerConfig::default()
            .with_algorithm(algorithm)
            .with_size(size)
            .with_speed(speed)
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = clamp_size(size);
        self
    }

    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = clamp_speed(speed);
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub(crate) fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.algorithm = algorithm;
    }

    pub(crate) fn set_size(&mut self, size: usize) {
        self.size = clamp_size(size);
    }

    pub(crate) fn set_speed(&mut self, speed: u32) {
        self.speed = clamp_speed(speed);
    }

    /// Gap between consecutive event applications.
    pub fn delay(&self) -> Duration {
        delay_for_speed(self.speed)
    }

    /// Random generator for this configuration's arrays.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Higher speed means a shorter delay: `101 - speed` milliseconds.
pub fn delay_for_speed(speed: u32) -> Duration {
    Duration::from_millis(u64::from(MAX_SPEED + 1 - clamp_speed(speed)))
}

pub fn clamp_size(size: usize) -> usize {
    size.clamp(MIN_SIZE, MAX_SIZE)
}

pub fn clamp_speed(speed: u32) -> u32 {
    speed.clamp(MIN_SPEED, MAX_SPEED)
}

/// Generate `size` values drawn uniformly from `MIN_VALUE..=MAX_VALUE`.
pub fn random_array<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Vec<u32> {
    (0..size).map(|_| rng.gen_range(MIN_VALUE..=MAX_VALUE)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VisualizerConfig::default();
        assert_eq!(config.algorithm(), Algorithm::Bubble);
        assert_eq!(config.size(), 20);
        assert_eq!(config.speed(), 50);
        assert_eq!(config.delay(), Duration::from_millis(51));
    }

    #[test]
    fn test_clamping() {
        let config = VisualizerConfig::new(Algorithm::Quick, 500, 0);
        assert_eq!(config.size(), MAX_SIZE);
        assert_eq!(config.speed(), MIN_SPEED);

        let config = config.with_size(1).with_speed(1000);
        assert_eq!(config.size(), MIN_SIZE);
        assert_eq!(config.speed(), MAX_SPEED);
    }

    #[test]
    fn test_delay_mapping() {
        assert_eq!(delay_for_speed(1), Duration::from_millis(100));
        assert_eq!(delay_for_speed(100), Duration::from_millis(1));
        assert_eq!(delay_for_speed(91), Duration::from_millis(10));
        assert!(delay_for_speed(80) < delay_for_speed(20));
    }

    #[test]
    fn test_random_array_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let data = random_array(MAX_SIZE, &mut rng);
        assert_eq!(data.len(), MAX_SIZE);
        assert!(data.iter().all(|&v| (MIN_VALUE..=MAX_VALUE).contains(&v)));
    }

    #[test]
    fn test_seeded_arrays_repeat() {
        let config = VisualizerConfig::default().with_seed(Some(42));
        let a = random_array(config.size(), &mut config.rng());
        let b = random_array(config.size(), &mut config.rng());
        assert_eq!(a, b);
    }
}
