//! # Population arrays
//!
//! A population is a 3-dimensional boolean array indexed
//! `[individual, marker, haplotype]`, where the haplotype axis always has
//! length 2 and `true` marks the presence of the effect allele. Populations
//! are owned by the caller; every operation in this crate reads them through
//! views and returns freshly allocated arrays.

use ndarray::{Array2, Array3, ArrayView3, Axis};

use crate::error::{BreedingError, Result};

/// Genotypes of a population, `[individual, marker, haplotype]`.
pub type Population = Array3<bool>;

/// Number of chromosome copies per individual.
pub const PLOIDY: usize = 2;

/// Checks that `population` has `n_markers` markers and two haplotypes.
pub fn validate(population: &ArrayView3<'_, bool>, n_markers: usize) -> Result<()> {
    let shape = population.shape();
    if shape[1] != n_markers {
        return Err(BreedingError::marker_mismatch(n_markers, shape[1]));
    }
    if shape[2] != PLOIDY {
        return Err(BreedingError::ShapeMismatch {
            expected: format!("{} haplotypes", PLOIDY),
            found: format!("{} haplotypes", shape[2]),
        });
    }
    Ok(())
}

/// Effect-allele count (0, 1 or 2) per individual and marker.
pub fn dosage(population: &ArrayView3<'_, bool>) -> Array2<f32> {
    population.fold_axis(Axis(2), 0.0, |count, &allele| {
        count + f32::from(u8::from(allele))
    })
}

/// Concatenates each individual's haplotypes into one 0/1 row of length
/// `2 * markers`, marker-major. Works for any memory layout of `population`.
pub fn flatten_haplotypes(population: &ArrayView3<'_, bool>) -> Array2<f32> {
    let (n_individuals, n_markers, n_haplotypes) = population.dim();
    Array2::from_shape_fn(
        (n_individuals, n_markers * n_haplotypes),
        |(individual, column)| {
            let allele = population[[individual, column / n_haplotypes, column % n_haplotypes]];
            f32::from(u8::from(allele))
        },
    )
}

/// Builds a homozygous individual-major population from per-individual
/// allele rows.
///
/// # Errors
///
/// Returns `BreedingError::ShapeMismatch` if the rows differ in length.
pub fn homozygous(rows: &[Vec<bool>]) -> Result<Population> {
    let n_markers = rows.first().map_or(0, Vec::len);
    if let Some(row) = rows.iter().find(|row| row.len() != n_markers) {
        return Err(BreedingError::marker_mismatch(n_markers, row.len()));
    }
    Ok(Population::from_shape_fn(
        (rows.len(), n_markers, PLOIDY),
        |(individual, marker, _)| rows[individual][marker],
    ))
}
