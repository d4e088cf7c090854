//! # Genetic Map
//!
//! The genetic map is the ordered marker table a simulator is built from.
//! Every marker carries a chromosome identifier, the raw recombination rate to
//! the *next* marker, and one effect per modelled trait.
//!
//! This module provides:
//! - `MarkerRecord`: one row of the table
//! - `GeneticMap`: the validated table, with the marker-effect matrix
//! - `RecombinationVector`: the per-marker crossover model derived from it
//!
//! ## Example
//!
//! ```rust
//! use breedsim::genetic_map::{GeneticMap, MarkerRecord};
//!
//! let map = GeneticMap::from_records(&[
//!     MarkerRecord::new(1, 0.0, vec![0.3]),
//!     MarkerRecord::new(1, 0.5, vec![-0.1]),
//!     MarkerRecord::new(1, 0.0, vec![0.2]),
//! ])
//! .unwrap();
//!
//! let recombination = map.recombination_vector();
//! assert_eq!(recombination.as_slice(), [0.5, 0.0, 0.5]);
//! ```

mod reader;
mod recombination;

pub use reader::{CHROMOSOME_COLUMNS, DEFAULT_EFFECT_COLUMN, RECOMBINATION_COLUMN};
pub use recombination::{RecombinationVector, CHROMOSOME_START_PROBABILITY};

use std::collections::HashSet;

use ndarray::{Array2, ArrayView2};
use tracing::{debug, warn};

use crate::error::{BreedingError, Result, ResultExt};

/// One row of a genetic map.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerRecord {
    /// Chromosome the marker lies on.
    pub chromosome: i32,
    /// Probability of a crossover between this marker and the next one.
    pub recombination_rate: f32,
    /// Effect of one copy of the effect allele, per trait.
    pub effects: Vec<f32>,
}

impl MarkerRecord {
    pub fn new(chromosome: i32, recombination_rate: f32, effects: Vec<f32>) -> Self {
        Self {
            chromosome,
            recombination_rate,
            effects,
        }
    }
}

/// A validated genetic map.
///
/// Markers are grouped contiguously by chromosome and every marker has the
/// same number of trait effects. The map is immutable once built.
#[derive(Debug, Clone)]
pub struct GeneticMap {
    chromosomes: Vec<i32>,
    recombination_rates: Vec<f32>,
    /// Marker effects, `[marker, trait]`.
    effects: Array2<f32>,
    chromosome_starts: Vec<usize>,
}

impl GeneticMap {
    /// Builds a genetic map from marker records.
    ///
    /// # Errors
    ///
    /// Returns `BreedingError::DataFormat` if:
    /// - there are no records
    /// - a record has no effects, or a different number of effects than the first
    /// - a recombination rate is not a finite value in `[0, 1]`
    /// - an effect is not finite
    /// - the markers of a chromosome are not contiguous
    pub fn from_records(records: &[MarkerRecord]) -> Result<Self> {
        let first = records.first().ok_or_else(|| {
            BreedingError::DataFormat("Genetic map has no markers".to_string())
        })?;
        let n_traits = first.effects.len();
        if n_traits == 0 {
            return Err(BreedingError::DataFormat(
                "Genetic map has no trait effect column".to_string(),
            ));
        }

        let mut chromosomes = Vec::with_capacity(records.len());
        let mut recombination_rates = Vec::with_capacity(records.len());
        let mut effects = Vec::with_capacity(records.len() * n_traits);
        let mut chromosome_starts = Vec::new();
        let mut closed: HashSet<i32> = HashSet::new();

        for (marker, record) in records.iter().enumerate() {
            if record.effects.len() != n_traits {
                return Err(BreedingError::DataFormat(format!(
                    "Marker {} has {} effects, expected {}",
                    marker,
                    record.effects.len(),
                    n_traits
                )));
            }
            if !record.recombination_rate.is_finite()
                || !(0.0..=1.0).contains(&record.recombination_rate)
            {
                return Err(BreedingError::DataFormat(format!(
                    "Marker {} has recombination rate {}, expected a value in [0, 1]",
                    marker, record.recombination_rate
                )));
            }
            if let Some(effect) = record.effects.iter().find(|e| !e.is_finite()) {
                return Err(BreedingError::DataFormat(format!(
                    "Marker {} has non-finite effect {}",
                    marker, effect
                )));
            }

            if chromosomes.last() != Some(&record.chromosome) {
                if let Some(&previous) = chromosomes.last() {
                    closed.insert(previous);
                }
                if closed.contains(&record.chromosome) {
                    return Err(BreedingError::DataFormat(format!(
                        "Chromosome {} is interleaved with other chromosomes at marker {}",
                        record.chromosome, marker
                    )));
                }
                chromosome_starts.push(marker);
            }

            chromosomes.push(record.chromosome);
            recombination_rates.push(record.recombination_rate);
            effects.extend_from_slice(&record.effects);
        }

        let effects = Array2::from_shape_vec((records.len(), n_traits), effects)
            .context("Cannot assemble marker effects")?;

        let map = Self {
            chromosomes,
            recombination_rates,
            effects,
            chromosome_starts,
        };
        map.warn_on_singleton_chromosomes();

        debug!(
            markers = map.n_markers(),
            traits = map.n_traits(),
            chromosomes = map.n_chromosomes(),
            "genetic map loaded"
        );

        Ok(map)
    }

    fn warn_on_singleton_chromosomes(&self) {
        for (i, &start) in self.chromosome_starts.iter().enumerate() {
            let end = self
                .chromosome_starts
                .get(i + 1)
                .copied()
                .unwrap_or(self.n_markers());
            if end - start == 1 {
                warn!(
                    chromosome = self.chromosomes[start],
                    "chromosome has a single marker"
                );
            }
        }
    }

    pub fn n_markers(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn n_traits(&self) -> usize {
        self.effects.ncols()
    }

    pub fn n_chromosomes(&self) -> usize {
        self.chromosome_starts.len()
    }

    /// Chromosome of each marker.
    pub fn chromosomes(&self) -> &[i32] {
        &self.chromosomes
    }

    /// Index of the first marker of each chromosome, in map order.
    pub fn chromosome_starts(&self) -> &[usize] {
        &self.chromosome_starts
    }

    /// Raw recombination rate of each marker to the next one.
    pub fn recombination_rates(&self) -> &[f32] {
        &self.recombination_rates
    }

    /// Marker-effect matrix, `[marker, trait]`.
    pub fn marker_effects(&self) -> ArrayView2<'_, f32> {
        self.effects.view()
    }

    /// Derives the crossover model: the rate of marker `i - 1` becomes the
    /// probability of a crossover just before marker `i`, and the first marker
    /// of every chromosome is set to 0.5.
    pub fn recombination_vector(&self) -> RecombinationVector {
        RecombinationVector::from_map(self)
    }
}
