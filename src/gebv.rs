//! # BreedingValueModel
//!
//! Genomic estimated breeding values (GEBV) are a linear function of marker
//! dosage: for every trait, `gebv = Σ dosage[marker] * effect[marker]`, where
//! dosage counts the effect allele over both haplotypes.
//!
//! The model also caches population-independent aggregates of the achievable
//! breeding value per trait. They assume every allele is an independent
//! Bernoulli(0.5) draw, so each dosage is Binomial(2, 0.5):
//!
//! | aggregate | formula |
//! |---|---|
//! | maximum | `2 · Σ max(e, 0)` |
//! | minimum | `2 · Σ min(e, 0)` |
//! | mean | `Σ e` |
//! | variance | `Σ e² / 2` |
//!
//! which always satisfy `min ≤ mean ≤ max` and `var ≥ 0`.

use std::sync::Arc;

use ndarray::{Array1, Array2, ArrayView3, Axis};

use crate::{error::Result, population};

/// Per-trait aggregates of the achievable breeding value.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GebvStatistics {
    pub max: Array1<f32>,
    pub min: Array1<f32>,
    pub mean: Array1<f32>,
    pub var: Array1<f32>,
}

impl GebvStatistics {
    fn from_effects(effects: &Array2<f32>) -> Self {
        Self {
            max: effects.fold_axis(Axis(0), 0.0, |acc, &e| acc + 2.0 * e.max(0.0)),
            min: effects.fold_axis(Axis(0), 0.0, |acc, &e| acc + 2.0 * e.min(0.0)),
            mean: effects.sum_axis(Axis(0)),
            var: effects.fold_axis(Axis(0), 0.0, |acc, &e| acc + e * e / 2.0),
        }
    }
}

/// Linear genotype-to-breeding-value model.
#[derive(Debug, Clone)]
pub struct BreedingValueModel {
    /// `[marker, trait]`
    effects: Arc<Array2<f32>>,
    statistics: GebvStatistics,
}

impl BreedingValueModel {
    /// Builds the model and caches its aggregates.
    pub fn new(marker_effects: Array2<f32>) -> Self {
        let statistics = GebvStatistics::from_effects(&marker_effects);
        Self {
            effects: Arc::new(marker_effects),
            statistics,
        }
    }

    pub fn n_markers(&self) -> usize {
        self.effects.nrows()
    }

    pub fn n_traits(&self) -> usize {
        self.effects.ncols()
    }

    pub fn marker_effects(&self) -> &Array2<f32> {
        &self.effects
    }

    /// Breeding values of every individual, `[individual, trait]`.
    ///
    /// # Errors
    ///
    /// Returns `BreedingError::ShapeMismatch` if the population's marker axis
    /// does not match the model.
    pub fn evaluate(&self, population: &ArrayView3<'_, bool>) -> Result<Array2<f32>> {
        population::validate(population, self.n_markers())?;
        Ok(population::dosage(population).dot(&*self.effects))
    }

    pub fn statistics(&self) -> &GebvStatistics {
        &self.statistics
    }

    pub fn max(&self) -> &Array1<f32> {
        &self.statistics.max
    }

    pub fn min(&self) -> &Array1<f32> {
        &self.statistics.min
    }

    pub fn mean(&self) -> &Array1<f32> {
        &self.statistics.mean
    }

    pub fn var(&self) -> &Array1<f32> {
        &self.statistics.var
    }
}
