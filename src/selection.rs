//! Truncation selection: keep the best `k` individuals of a population.
//!
//! # Examples
//!
//! ```
//! use breedsim::population::Population;
//! use breedsim::selection::select_top_k;
//!
//! let population = Population::from_shape_fn((3, 2, 2), |(i, _, _)| i == 1);
//! let scores = [0.5, 0.8, 0.3];
//!
//! let (selected, indices) = select_top_k(&population.view(), &scores, 2).unwrap();
//! assert_eq!(indices, vec![1, 0]);
//! assert_eq!(selected.dim(), (2, 2, 2));
//! ```

use std::cmp::Ordering;

use ndarray::{ArrayView3, Axis};

use crate::error::{BreedingError, Result};
use crate::population::Population;

/// The score individuals are ranked by.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionIndex {
    /// Breeding value of the trait at this column.
    Gebv(usize),
    /// One simulated phenotype observation of the trait at this column.
    Phenotype(usize),
}

/// Orders scores from best to worst, with NaN last.
fn descending(a: f32, b: f32) -> Ordering {
    b.partial_cmp(&a).unwrap_or_else(|| {
        if a.is_nan() && b.is_nan() {
            Ordering::Equal
        } else if a.is_nan() {
            Ordering::Greater
        } else {
            Ordering::Less
        }
    })
}

/// Checks that `k` individuals can be kept from a population of `len`.
pub(crate) fn check_selection_size(len: usize, k: usize) -> Result<()> {
    if len == 0 {
        return Err(BreedingError::EmptyPopulation);
    }
    if k == 0 || k > len {
        return Err(BreedingError::Configuration(format!(
            "Cannot select {} individuals from a population of {}",
            k, len
        )));
    }
    Ok(())
}

/// Selects the `k` highest scoring individuals.
///
/// Returns the selected individuals, best first, and their indices in the
/// input population. Ties keep population order.
///
/// # Errors
///
/// - `BreedingError::EmptyPopulation` if there is nobody to select
/// - `BreedingError::Configuration` if `k` is zero or exceeds the population size
/// - `BreedingError::ShapeMismatch` if there is not one score per individual
pub fn select_top_k(
    population: &ArrayView3<'_, bool>,
    scores: &[f32],
    k: usize,
) -> Result<(Population, Vec<usize>)> {
    let len = population.len_of(Axis(0));
    check_selection_size(len, k)?;
    if scores.len() != len {
        return Err(BreedingError::ShapeMismatch {
            expected: format!("{} scores", len),
            found: format!("{} scores", scores.len()),
        });
    }

    let mut indices: Vec<usize> = (0..len).collect();
    indices.sort_by(|&a, &b| descending(scores[a], scores[b]));
    indices.truncate(k);

    Ok((population.select(Axis(0), &indices), indices))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn population(n: usize) -> Population {
        Population::from_shape_fn((n, 3, 2), |(i, m, _)| (i >> m) & 1 == 1)
    }

    #[test]
    fn test_selects_best_in_order() {
        let population = population(5);
        let (selected, indices) =
            select_top_k(&population.view(), &[0.1, 0.9, 0.5, 0.7, 0.2], 3).unwrap();

        assert_eq!(indices, vec![1, 3, 2]);
        assert_eq!(selected.index_axis(Axis(0), 0), population.index_axis(Axis(0), 1));
        assert_eq!(selected.index_axis(Axis(0), 2), population.index_axis(Axis(0), 2));
    }

    #[test]
    fn test_ties_keep_population_order() {
        let population = population(4);
        let (_, indices) = select_top_k(&population.view(), &[1.0, 2.0, 2.0, 1.0], 4).unwrap();
        assert_eq!(indices, vec![1, 2, 0, 3]);
    }

    #[test]
    fn test_nan_ranks_last() {
        let population = population(3);
        let (_, indices) =
            select_top_k(&population.view(), &[f32::NAN, -5.0, 0.0], 3).unwrap();
        assert_eq!(indices, vec![2, 1, 0]);
    }

    #[test]
    fn test_invalid_k() {
        let population = population(3);
        assert!(matches!(
            select_top_k(&population.view(), &[1.0, 2.0, 3.0], 0),
            Err(BreedingError::Configuration(_))
        ));
        assert!(matches!(
            select_top_k(&population.view(), &[1.0, 2.0, 3.0], 4),
            Err(BreedingError::Configuration(_))
        ));
    }

    #[test]
    fn test_empty_population() {
        let population = population(0);
        assert!(matches!(
            select_top_k(&population.view(), &[], 1),
            Err(BreedingError::EmptyPopulation)
        ));
    }

    #[test]
    fn test_score_count_mismatch() {
        let population = population(3);
        assert!(matches!(
            select_top_k(&population.view(), &[1.0], 1),
            Err(BreedingError::ShapeMismatch { .. })
        ));
    }
}
