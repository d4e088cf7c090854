//! # CrossoverEngine
//!
//! The `CrossoverEngine` simulates meiosis. For every parent taking part in a
//! cross it samples one crossover event per marker from the
//! [`RecombinationVector`], turns the events into a [`CrossoverMask`] with an
//! inclusive parity scan, and copies the haplotype the mask selects at each
//! marker into a gamete. A progeny pairs one gamete from each of its parents.
//!
//! ## Reproducibility
//!
//! Meioses are independent, so batches are evaluated with rayon once they
//! reach the configured parallel threshold. To keep results independent of
//! scheduling, the caller's generator is advanced sequentially to fork one
//! child generator per progeny before any work is distributed: the same seed
//! gives the same progeny whether the batch ran sequentially or in parallel.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use breedsim::crossover::{CrossSpec, CrossoverEngine};
//! use breedsim::genetic_map::{GeneticMap, MarkerRecord};
//! use breedsim::population::Population;
//! use breedsim::rng::RandomNumberGenerator;
//!
//! let map = GeneticMap::from_records(&[
//!     MarkerRecord::new(1, 0.1, vec![1.0]),
//!     MarkerRecord::new(1, 0.1, vec![1.0]),
//!     MarkerRecord::new(2, 0.1, vec![1.0]),
//! ])
//! .unwrap();
//! let engine = CrossoverEngine::new(Arc::new(map.recombination_vector()), 1000);
//!
//! let population = Population::from_elem((4, 3, 2), false);
//! let spec = CrossSpec::new(vec![(0, 1), (2, 3)], 5).unwrap();
//! let mut rng = RandomNumberGenerator::from_seed(42);
//!
//! let progeny = engine.cross(&population.view(), &spec, &mut rng).unwrap();
//! assert_eq!(progeny.dim(), (10, 3, 2));
//! ```

mod mask;
mod spec;

pub use mask::CrossoverMask;
pub use spec::CrossSpec;

use std::sync::Arc;

use ndarray::{parallel::prelude::*, Array1, Array2, ArrayView2, ArrayView3, ArrayViewMut2, Axis};
use tracing::trace;

use crate::{
    error::{BreedingError, Result},
    genetic_map::RecombinationVector,
    population::{self, Population, PLOIDY},
    rng::RandomNumberGenerator,
};

/// One progeny to produce: its parents and the generator its meioses draw from.
struct Offspring {
    parents: [usize; 2],
    rng: RandomNumberGenerator,
    /// Double the single gamete of `parents[0]` instead of pairing two gametes.
    doubled: bool,
}

/// Produces progeny genotypes from parent genotypes.
#[derive(Debug, Clone)]
pub struct CrossoverEngine {
    recombination: Arc<RecombinationVector>,
    /// Minimum number of meioses to process in parallel
    parallel_threshold: usize,
}

impl CrossoverEngine {
    pub fn new(recombination: Arc<RecombinationVector>, parallel_threshold: usize) -> Self {
        Self {
            recombination,
            parallel_threshold,
        }
    }

    pub fn n_markers(&self) -> usize {
        self.recombination.len()
    }

    pub fn recombination(&self) -> &RecombinationVector {
        &self.recombination
    }

    /// Samples the crossover mask of one meiosis.
    pub fn crossover_mask(&self, rng: &mut RandomNumberGenerator) -> CrossoverMask {
        CrossoverMask::sample(&self.recombination, rng)
    }

    /// Assembles the gamete a parent (`[marker, haplotype]`) transmits under `mask`.
    ///
    /// # Errors
    ///
    /// Returns `BreedingError::ShapeMismatch` if the parent, the mask and the
    /// genetic map disagree on the number of markers.
    pub fn gamete(&self, parent: ArrayView2<'_, bool>, mask: &CrossoverMask) -> Result<Array1<bool>> {
        if parent.nrows() != self.n_markers() {
            return Err(BreedingError::marker_mismatch(self.n_markers(), parent.nrows()));
        }
        if mask.len() != self.n_markers() {
            return Err(BreedingError::marker_mismatch(self.n_markers(), mask.len()));
        }
        if parent.ncols() != PLOIDY {
            return Err(BreedingError::ShapeMismatch {
                expected: format!("{} haplotypes", PLOIDY),
                found: format!("{} haplotypes", parent.ncols()),
            });
        }
        Ok(select_haplotypes(parent, mask))
    }

    /// Crosses one pair with explicit masks, one per parent, without drawing
    /// any randomness. Returns the progeny genotype, `[marker, haplotype]`.
    pub fn cross_with_masks(
        &self,
        population: &ArrayView3<'_, bool>,
        pair: (usize, usize),
        masks: [&CrossoverMask; 2],
    ) -> Result<Array2<bool>> {
        population::validate(population, self.n_markers())?;
        let spec = CrossSpec::single(vec![pair])?;
        spec.validate(population.len_of(Axis(0)))?;

        let mut progeny = Array2::from_elem((self.n_markers(), PLOIDY), false);
        for (haplotype, (parent, mask)) in [pair.0, pair.1].into_iter().zip(masks).enumerate() {
            let gamete = self.gamete(population.index_axis(Axis(0), parent), mask)?;
            progeny.column_mut(haplotype).assign(&gamete);
        }
        Ok(progeny)
    }

    /// Crosses the pairs listed in `spec`.
    ///
    /// Returns a population of `spec.n_progeny()` individuals with the input's
    /// marker and haplotype shape; the input is left untouched.
    ///
    /// # Errors
    ///
    /// - `BreedingError::ShapeMismatch` if the population does not match the map
    /// - `BreedingError::IndexOutOfBounds` if a parent index is outside the population
    pub fn cross(
        &self,
        population: &ArrayView3<'_, bool>,
        spec: &CrossSpec,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population> {
        population::validate(population, self.n_markers())?;
        spec.validate(population.len_of(Axis(0)))?;

        let offspring = spec
            .progeny_parents()
            .map(|parents| Offspring {
                parents,
                rng: rng.fork(),
                doubled: false,
            })
            .collect();
        Ok(self.run(population, offspring))
    }

    /// Produces `n_offspring` doubled haploid lines from every individual.
    ///
    /// Each line carries one gamete of its parent on both haplotypes and is
    /// therefore fully homozygous. Lines are grouped by parent, in population
    /// order.
    pub fn double_haploid(
        &self,
        population: &ArrayView3<'_, bool>,
        n_offspring: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population> {
        population::validate(population, self.n_markers())?;
        if n_offspring == 0 {
            return Err(BreedingError::Configuration(
                "Number of offspring cannot be zero".to_string(),
            ));
        }

        let offspring = (0..population.len_of(Axis(0)))
            .flat_map(|parent| std::iter::repeat(parent).take(n_offspring))
            .map(|parent| Offspring {
                parents: [parent, parent],
                rng: rng.fork(),
                doubled: true,
            })
            .collect();
        Ok(self.run(population, offspring))
    }

    /// Draws `n_crosses` pairs of distinct individuals uniformly at random and
    /// crosses each pair once. Returns the progeny and the pairs crossed.
    ///
    /// Fails with `BreedingError::ShapeMismatch` on a population that does not
    /// match the map and `BreedingError::EmptyPopulation` when fewer than two
    /// individuals are available, in both cases before any draw.
    pub fn random_crosses(
        &self,
        population: &ArrayView3<'_, bool>,
        n_crosses: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<(Population, CrossSpec)> {
        population::validate(population, self.n_markers())?;
        let len = population.len_of(Axis(0));
        if len < 2 {
            return Err(BreedingError::EmptyPopulation);
        }

        let pairs = (0..n_crosses)
            .map(|_| {
                let first = rng.gen_index(len);
                let mut second = rng.gen_index(len - 1);
                if second >= first {
                    second += 1;
                }
                (first, second)
            })
            .collect();
        let spec = CrossSpec::single(pairs)?;
        let progeny = self.cross(population, &spec, rng)?;
        Ok((progeny, spec))
    }

    fn run(&self, population: &ArrayView3<'_, bool>, offspring: Vec<Offspring>) -> Population {
        let mut progeny = Population::from_elem((offspring.len(), self.n_markers(), PLOIDY), false);
        let parallel = offspring.len() * PLOIDY >= self.parallel_threshold;
        trace!(progeny = offspring.len(), parallel, "running meioses");

        if parallel {
            progeny
                .axis_iter_mut(Axis(0))
                .into_par_iter()
                .zip(offspring.into_par_iter())
                .for_each(|(individual, task)| self.meiosis(population, individual, task));
        } else {
            progeny
                .axis_iter_mut(Axis(0))
                .zip(offspring)
                .for_each(|(individual, task)| self.meiosis(population, individual, task));
        }

        progeny
    }

    fn meiosis(
        &self,
        population: &ArrayView3<'_, bool>,
        mut individual: ArrayViewMut2<'_, bool>,
        task: Offspring,
    ) {
        let Offspring {
            parents,
            mut rng,
            doubled,
        } = task;

        for (haplotype, &parent) in parents.iter().enumerate() {
            let mask = self.crossover_mask(&mut rng);
            let gamete = select_haplotypes(population.index_axis(Axis(0), parent), &mask);
            if doubled {
                individual.column_mut(0).assign(&gamete);
                individual.column_mut(1).assign(&gamete);
                break;
            }
            individual.column_mut(haplotype).assign(&gamete);
        }
    }
}

fn select_haplotypes(parent: ArrayView2<'_, bool>, mask: &CrossoverMask) -> Array1<bool> {
    parent
        .outer_iter()
        .zip(mask.iter())
        .map(|(alleles, &selected)| alleles[usize::from(selected)])
        .collect()
}
