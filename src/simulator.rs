//! # BreedingSimulator
//!
//! The `BreedingSimulator` ties the pieces together. It is built once from a
//! genetic map and a [`SimulatorConfig`]; the recombination vector, the
//! marker effects and the cached breeding-value aggregates derived at that
//! point never change afterwards and are shared read-only.
//!
//! Stochastic operations (`cross`, `double_haploid`, `random_crosses`,
//! `phenotype`, `select` on phenotypes) draw from the simulator's own
//! [`RandomNumberGenerator`] and therefore take `&mut self`. Deterministic
//! operations (`gebv`, `diversity`) take `&self` and may run concurrently.
//!
//! ## Example
//!
//! ```rust
//! use breedsim::config::SimulatorConfig;
//! use breedsim::crossover::CrossSpec;
//! use breedsim::genetic_map::{GeneticMap, MarkerRecord};
//! use breedsim::population::Population;
//! use breedsim::simulator::BreedingSimulator;
//!
//! let map = GeneticMap::from_records(&[
//!     MarkerRecord::new(1, 0.2, vec![1.0]),
//!     MarkerRecord::new(1, 0.2, vec![-0.5]),
//!     MarkerRecord::new(2, 0.0, vec![0.25]),
//! ])
//! .unwrap();
//! let config = SimulatorConfig::builder().seed(7).build().unwrap();
//! let mut simulator = BreedingSimulator::new(map, config).unwrap();
//!
//! let population = Population::from_shape_fn((4, 3, 2), |(i, m, _)| (i + m) % 2 == 0);
//! let spec = CrossSpec::new(vec![(0, 1), (2, 3)], 3).unwrap();
//! let progeny = simulator.cross(&population, &spec).unwrap();
//!
//! let gebv = simulator.gebv(&progeny).unwrap();
//! assert_eq!(gebv.dim(), (6, 1));
//! ```

use std::sync::Arc;

use ndarray::{Array1, Array2, Axis};
use tracing::debug;

use crate::{
    config::SimulatorConfig,
    crossover::{CrossSpec, CrossoverEngine},
    error::{BreedingError, Result},
    gebv::{BreedingValueModel, GebvStatistics},
    genetic_map::{GeneticMap, RecombinationVector},
    phenotype::PhenotypeSimulator,
    population::{self, Population, PLOIDY},
    rng::RandomNumberGenerator,
    selection::{self, SelectionIndex},
    statistics,
};

#[derive(Debug, Clone)]
pub struct BreedingSimulator {
    config: SimulatorConfig,
    recombination: Arc<RecombinationVector>,
    gebv_model: Arc<BreedingValueModel>,
    crossover: CrossoverEngine,
    phenotype: PhenotypeSimulator,
    rng: RandomNumberGenerator,
}

impl BreedingSimulator {
    /// Builds a simulator.
    ///
    /// # Errors
    ///
    /// Returns `BreedingError::DataFormat` if the map's effect columns do not
    /// match the configured traits.
    pub fn new(genetic_map: GeneticMap, config: SimulatorConfig) -> Result<Self> {
        if genetic_map.n_traits() != config.n_traits() {
            return Err(BreedingError::DataFormat(format!(
                "Genetic map has {} effect columns but {} traits are configured",
                genetic_map.n_traits(),
                config.n_traits()
            )));
        }

        let recombination = Arc::new(genetic_map.recombination_vector());
        let gebv_model = Arc::new(BreedingValueModel::new(
            genetic_map.marker_effects().to_owned(),
        ));
        let phenotype = PhenotypeSimulator::new(&gebv_model, config.h2())?;
        let crossover = CrossoverEngine::new(recombination.clone(), config.parallel_threshold());
        let rng = config
            .seed()
            .map_or_else(RandomNumberGenerator::new, RandomNumberGenerator::from_seed);

        debug!(
            markers = genetic_map.n_markers(),
            chromosomes = genetic_map.n_chromosomes(),
            traits = ?config.trait_names(),
            seeded = config.seed().is_some(),
            "breeding simulator ready"
        );

        Ok(Self {
            config,
            recombination,
            gebv_model,
            crossover,
            phenotype,
            rng,
        })
    }

    /// Loads the genetic map from a file and builds a simulator.
    pub fn from_path<P: AsRef<std::path::Path>>(path: P, config: SimulatorConfig) -> Result<Self> {
        let map = GeneticMap::from_path(path, config.trait_names())?;
        Self::new(map, config)
    }

    /// Crosses the pairs listed in `spec`. See [`CrossoverEngine::cross`].
    pub fn cross(&mut self, population: &Population, spec: &CrossSpec) -> Result<Population> {
        self.crossover.cross(&population.view(), spec, &mut self.rng)
    }

    /// Produces `n_offspring` doubled haploid lines per individual.
    pub fn double_haploid(&mut self, population: &Population, n_offspring: usize) -> Result<Population> {
        self.crossover
            .double_haploid(&population.view(), n_offspring, &mut self.rng)
    }

    /// Crosses `n_crosses` random pairs of distinct individuals.
    pub fn random_crosses(
        &mut self,
        population: &Population,
        n_crosses: usize,
    ) -> Result<(Population, CrossSpec)> {
        self.crossover
            .random_crosses(&population.view(), n_crosses, &mut self.rng)
    }

    /// Breeding values, `[individual, trait]` in configured trait order.
    pub fn gebv(&self, population: &Population) -> Result<Array2<f32>> {
        self.gebv_model.evaluate(&population.view())
    }

    /// One fresh phenotype observation, `[individual, trait]`.
    pub fn phenotype(&mut self, population: &Population) -> Result<Array2<f32>> {
        self.phenotype
            .phenotype(&self.gebv_model, &population.view(), &mut self.rng)
    }

    /// Correlation of every individual with the population centroid.
    pub fn diversity(&self, population: &Population) -> Result<Array1<f32>> {
        population::validate(&population.view(), self.n_markers())?;
        statistics::diversity(&population.view())
    }

    /// Keeps the `k` best individuals under `index`, best first, with their
    /// indices in `population`. Invalid requests fail without drawing from
    /// the random source.
    pub fn select(
        &mut self,
        population: &Population,
        k: usize,
        index: SelectionIndex,
    ) -> Result<(Population, Vec<usize>)> {
        let column = match index {
            SelectionIndex::Gebv(column) | SelectionIndex::Phenotype(column) => column,
        };
        if column >= self.n_traits() {
            return Err(BreedingError::Configuration(format!(
                "Trait column {} does not exist, {} traits are configured",
                column,
                self.n_traits()
            )));
        }
        // Validate everything before phenotype noise is drawn.
        population::validate(&population.view(), self.n_markers())?;
        selection::check_selection_size(population.len_of(Axis(0)), k)?;

        let table = match index {
            SelectionIndex::Gebv(_) => self.gebv(population)?,
            SelectionIndex::Phenotype(_) => self.phenotype(population)?,
        };
        let scores = table.column(column).to_vec();
        selection::select_top_k(&population.view(), &scores, k)
    }

    /// Draws a random population of `n_individuals` with every allele a fair
    /// coin flip.
    pub fn random_population(&mut self, n_individuals: usize) -> Population {
        let rng = &mut self.rng;
        Population::from_shape_simple_fn(
            (n_individuals, self.recombination.len(), PLOIDY),
            || rng.gen_index(2) == 1,
        )
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn trait_names(&self) -> &[String] {
        self.config.trait_names()
    }

    pub fn n_traits(&self) -> usize {
        self.config.n_traits()
    }

    pub fn h2(&self) -> &Array1<f32> {
        self.phenotype.h2()
    }

    pub fn n_markers(&self) -> usize {
        self.recombination.len()
    }

    pub fn recombination_vector(&self) -> &RecombinationVector {
        &self.recombination
    }

    pub fn gebv_model(&self) -> &BreedingValueModel {
        &self.gebv_model
    }

    pub fn gebv_statistics(&self) -> &GebvStatistics {
        self.gebv_model.statistics()
    }

    pub fn max_gebv(&self) -> &Array1<f32> {
        self.gebv_model.max()
    }

    pub fn min_gebv(&self) -> &Array1<f32> {
        self.gebv_model.min()
    }

    pub fn mean_gebv(&self) -> &Array1<f32> {
        self.gebv_model.mean()
    }

    pub fn var_gebv(&self) -> &Array1<f32> {
        self.gebv_model.var()
    }
}
