//! Diversity of a population relative to its centroid.
//!
//! Each individual's two haplotypes are flattened into one 0/1 vector, the
//! population centroid is the mean of those vectors, and an individual's score
//! is the Pearson correlation between its vector and the centroid. High scores
//! mean the individual looks like the population average.
//!
//! Degenerate inputs have fixed values instead of NaN:
//! - an individual identical to the centroid scores [`IDENTICAL_CORRELATION`];
//!   this covers a single-individual population and a population of clones
//! - otherwise, if either vector is constant the score is
//!   [`UNDEFINED_CORRELATION`]
//! - an empty population yields an empty vector

use ndarray::{parallel::prelude::*, Array1, ArrayView1, ArrayView3, Axis};

use crate::{error::Result, population};

/// Score of an individual equal to the population centroid.
pub const IDENTICAL_CORRELATION: f32 = 1.0;

/// Score when a correlation is undefined because a vector is constant.
pub const UNDEFINED_CORRELATION: f32 = 0.0;

/// Pearson correlation of two equally long vectors, with the degenerate
/// cases resolved as described in the module documentation.
pub fn pearson_correlation(x: ArrayView1<'_, f32>, y: ArrayView1<'_, f32>) -> f32 {
    if x == y {
        return IDENTICAL_CORRELATION;
    }
    let (Some(mean_x), Some(mean_y)) = (x.mean(), y.mean()) else {
        return UNDEFINED_CORRELATION;
    };

    let (covariance, var_x, var_y) = x.iter().zip(y.iter()).fold(
        (0.0f32, 0.0f32, 0.0f32),
        |(cov, vx, vy), (&a, &b)| {
            let (da, db) = (a - mean_x, b - mean_y);
            (cov + da * db, vx + da * da, vy + db * db)
        },
    );

    if var_x <= 0.0 || var_y <= 0.0 {
        return UNDEFINED_CORRELATION;
    }
    (covariance / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

/// Correlation of every individual with the population centroid.
///
/// # Errors
///
/// Returns `BreedingError::ShapeMismatch` if the haplotype axis is not of
/// length 2.
pub fn diversity(population: &ArrayView3<'_, bool>) -> Result<Array1<f32>> {
    population::validate(population, population.len_of(Axis(1)))?;
    let flat = population::flatten_haplotypes(population);
    let Some(centroid) = flat.mean_axis(Axis(0)) else {
        return Ok(Array1::zeros(0));
    };

    let scores: Vec<f32> = flat
        .axis_iter(Axis(0))
        .into_par_iter()
        .map(|individual| pearson_correlation(individual, centroid.view()))
        .collect();
    Ok(Array1::from(scores))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::Population;
    use ndarray::array;

    #[test]
    fn test_pearson_known_values() {
        let x = array![1.0, 2.0, 3.0];
        assert!((pearson_correlation(x.view(), array![2.0, 4.0, 6.5].view()) - 0.998).abs() < 1e-3);
        assert!((pearson_correlation(x.view(), array![3.0, 2.0, 1.0].view()) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_pearson_constant_vector() {
        let x = array![1.0, 1.0, 1.0];
        let y = array![0.0, 1.0, 0.5];
        assert_eq!(pearson_correlation(x.view(), y.view()), UNDEFINED_CORRELATION);
    }

    #[test]
    fn test_identical_population() {
        let population = Population::from_shape_fn((5, 4, 2), |(_, m, h)| (m + h) % 3 == 0);
        let scores = diversity(&population.view()).unwrap();
        assert_eq!(scores, Array1::from_elem(5, 1.0));
    }

    #[test]
    fn test_identical_constant_population() {
        let population = Population::from_elem((3, 4, 2), false);
        let scores = diversity(&population.view()).unwrap();
        assert_eq!(scores, Array1::from_elem(3, 1.0));
    }

    #[test]
    fn test_single_individual() {
        let population = Population::from_shape_fn((1, 6, 2), |(_, m, h)| m % 2 == h);
        let scores = diversity(&population.view()).unwrap();
        assert_eq!(scores, array![IDENTICAL_CORRELATION]);
    }

    #[test]
    fn test_empty_population() {
        let population = Population::from_elem((0, 6, 2), false);
        assert!(diversity(&population.view()).unwrap().is_empty());
    }

    #[test]
    fn test_scores_are_bounded() {
        let population =
            Population::from_shape_fn((8, 25, 2), |(i, m, h)| (i * 7 + m * 3 + h) % 5 < 2);
        let scores = diversity(&population.view()).unwrap();
        assert_eq!(scores.len(), 8);
        assert!(scores.iter().all(|s| (-1.0..=1.0).contains(s)));
    }

    #[test]
    fn test_rejects_wrong_ploidy() {
        let population = Population::from_elem((2, 4, 3), true);
        assert!(matches!(
            diversity(&population.view()),
            Err(crate::error::BreedingError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_non_standard_layout() {
        // Built marker-major, then viewed individual-major.
        let marker_major = Population::from_shape_fn((4, 3, 2), |(m, i, h)| (m * 5 + i * 3 + h) % 4 < 2);
        let population = marker_major.permuted_axes([1, 0, 2]);
        assert!(!population.is_standard_layout());

        let standard = population.as_standard_layout().to_owned();
        assert_eq!(population, standard);

        let scores = diversity(&population.view()).unwrap();
        assert_eq!(scores.len(), 3);
        assert_eq!(scores, diversity(&standard.view()).unwrap());
    }

    #[test]
    fn test_outlier_scores_lower() {
        // Four copies of one genotype and its complement.
        let mut population = Population::from_shape_fn((5, 10, 2), |(_, m, _)| m < 4);
        population
            .index_axis_mut(Axis(0), 4)
            .mapv_inplace(|allele| !allele);

        let scores = diversity(&population.view()).unwrap();
        assert!(scores[4] < scores[0]);
    }
}
