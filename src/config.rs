//! # SimulatorConfig
//!
//! The `SimulatorConfig` struct holds everything recognised at simulator
//! construction apart from the genetic map itself: the ordered trait names,
//! the heritability of each trait, an optional seed, and the batch size above
//! which crossing runs in parallel.
//!
//! ## Example
//!
//! ```rust
//! use breedsim::config::SimulatorConfig;
//!
//! // Defaults: a single "Yield" trait with heritability 1.0
//! let default_config = SimulatorConfig::default();
//! assert_eq!(default_config.trait_names(), ["Yield".to_string()]);
//!
//! let config = SimulatorConfig::builder()
//!     .trait_names(vec!["Yield".into(), "Height".into()])
//!     .h2(vec![0.4, 0.8])
//!     .seed(42)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.h2(), [0.4, 0.8]);
//! ```
//!
//! When `h2` is omitted every trait gets heritability 1.0. A heritability
//! vector whose length differs from the number of traits, or with a value
//! outside `[0, 1]`, is rejected with `BreedingError::Configuration`.

use crate::error::{BreedingError, Result};

/// Trait modelled when none is configured.
pub const DEFAULT_TRAIT: &str = "Yield";

/// Default number of meioses from which crossing is parallelised.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1000;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    trait_names: Vec<String>,
    h2: Vec<f32>,
    seed: Option<u64>,
    /// Minimum number of meioses to process in parallel
    parallel_threshold: usize,
}

impl SimulatorConfig {
    /// Creates a validated configuration.
    ///
    /// # Arguments
    ///
    /// * `trait_names` - Ordered trait names; defines output column order.
    /// * `h2` - Heritability per trait, or `None` for 1.0 everywhere.
    ///
    /// # Errors
    ///
    /// Returns `BreedingError::Configuration` if no trait is named, if the
    /// heritability length differs from the trait count, or if a heritability
    /// lies outside `[0, 1]`.
    pub fn new(trait_names: Vec<String>, h2: Option<Vec<f32>>) -> Result<Self> {
        Self::builder().trait_names(trait_names).maybe_h2(h2).build()
    }

    /// Returns a builder for creating a `SimulatorConfig` instance.
    pub fn builder() -> SimulatorConfigBuilder {
        SimulatorConfigBuilder::default()
    }

    pub fn trait_names(&self) -> &[String] {
        &self.trait_names
    }

    pub fn n_traits(&self) -> usize {
        self.trait_names.len()
    }

    pub fn h2(&self) -> &[f32] {
        &self.h2
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns the minimum number of meioses to process in parallel.
    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            trait_names: vec![DEFAULT_TRAIT.to_string()],
            h2: vec![1.0],
            seed: None,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// Builder for `SimulatorConfig`.
///
/// Provides a fluent interface for constructing `SimulatorConfig` instances.
#[derive(Debug, Clone, Default)]
pub struct SimulatorConfigBuilder {
    trait_names: Option<Vec<String>>,
    h2: Option<Vec<f32>>,
    seed: Option<u64>,
    parallel_threshold: Option<usize>,
}

impl SimulatorConfigBuilder {
    /// Sets the ordered trait names.
    pub fn trait_names(mut self, value: Vec<String>) -> Self {
        self.trait_names = Some(value);
        self
    }

    /// Sets the heritability of each trait.
    pub fn h2(mut self, value: Vec<f32>) -> Self {
        self.h2 = Some(value);
        self
    }

    fn maybe_h2(mut self, value: Option<Vec<f32>>) -> Self {
        self.h2 = value;
        self
    }

    /// Seeds the simulator's random source.
    pub fn seed(mut self, value: u64) -> Self {
        self.seed = Some(value);
        self
    }

    /// Sets the parallel threshold.
    pub fn parallel_threshold(mut self, value: usize) -> Self {
        self.parallel_threshold = Some(value);
        self
    }

    /// Builds and validates the `SimulatorConfig` instance.
    pub fn build(self) -> Result<SimulatorConfig> {
        let trait_names = self
            .trait_names
            .unwrap_or_else(|| vec![DEFAULT_TRAIT.to_string()]);
        if trait_names.is_empty() {
            return Err(BreedingError::Configuration(
                "At least one trait must be named".to_string(),
            ));
        }

        let h2 = self.h2.unwrap_or_else(|| vec![1.0; trait_names.len()]);
        if h2.len() != trait_names.len() {
            return Err(BreedingError::Configuration(format!(
                "Heritability has {} values but {} traits are named",
                h2.len(),
                trait_names.len()
            )));
        }
        if let Some(bad) = h2.iter().find(|h| !(0.0..=1.0).contains(*h)) {
            return Err(BreedingError::Configuration(format!(
                "Heritability must lie in [0, 1], got {}",
                bad
            )));
        }

        Ok(SimulatorConfig {
            trait_names,
            h2,
            seed: self.seed,
            parallel_threshold: self
                .parallel_threshold
                .unwrap_or(DEFAULT_PARALLEL_THRESHOLD),
        })
    }
}
