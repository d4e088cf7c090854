//! # BreedingSession
//!
//! A `BreedingSession` holds the evolving population of a breeding program
//! and memoizes the quantities an agent reads repeatedly between crossings.
//! Breeding values and diversity scores are computed on first access and kept
//! until the next state change (`step` or `reset`).
//!
//! Episode bookkeeping such as rewards or horizon truncation is left to the
//! caller; the session only tracks how many generations have been bred.
//!
//! ## Example
//!
//! ```rust
//! use breedsim::config::SimulatorConfig;
//! use breedsim::crossover::CrossSpec;
//! use breedsim::genetic_map::{GeneticMap, MarkerRecord};
//! use breedsim::session::BreedingSession;
//! use breedsim::simulator::BreedingSimulator;
//!
//! let map = GeneticMap::from_records(&[
//!     MarkerRecord::new(1, 0.3, vec![1.0]),
//!     MarkerRecord::new(1, 0.3, vec![2.0]),
//! ])
//! .unwrap();
//! let config = SimulatorConfig::builder().seed(3).build().unwrap();
//! let mut simulator = BreedingSimulator::new(map, config).unwrap();
//! let founders = simulator.random_population(8);
//!
//! let mut session = BreedingSession::new(simulator, founders).unwrap();
//! session.step(&CrossSpec::single(vec![(0, 1), (2, 3), (4, 5)]).unwrap()).unwrap();
//! assert_eq!(session.population().dim().0, 3);
//! assert_eq!(session.gebv().unwrap().dim(), (3, 1));
//! assert_eq!(session.generation(), 1);
//! ```

use ndarray::{Array1, Array2};
use tracing::debug;

use crate::{
    crossover::CrossSpec,
    error::Result,
    population::{self, Population},
    selection::SelectionIndex,
    simulator::BreedingSimulator,
};

#[derive(Debug, Clone)]
pub struct BreedingSession {
    simulator: BreedingSimulator,
    initial: Population,
    population: Population,
    generation: usize,
    gebv: Option<Array2<f32>>,
    diversity: Option<Array1<f32>>,
}

impl BreedingSession {
    /// Starts a session from a founder population.
    ///
    /// # Errors
    ///
    /// Returns `BreedingError::ShapeMismatch` if the founders do not match the
    /// simulator's genetic map.
    pub fn new(simulator: BreedingSimulator, founders: Population) -> Result<Self> {
        population::validate(&founders.view(), simulator.n_markers())?;
        Ok(Self {
            simulator,
            population: founders.clone(),
            initial: founders,
            generation: 0,
            gebv: None,
            diversity: None,
        })
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn simulator(&self) -> &BreedingSimulator {
        &self.simulator
    }

    pub fn simulator_mut(&mut self) -> &mut BreedingSimulator {
        &mut self.simulator
    }

    /// Breeding values of the current population, computed at most once per
    /// generation.
    pub fn gebv(&mut self) -> Result<&Array2<f32>> {
        let gebv = match self.gebv.take() {
            Some(gebv) => gebv,
            None => self.simulator.gebv(&self.population)?,
        };
        Ok(self.gebv.insert(gebv))
    }

    /// Diversity scores of the current population, computed at most once per
    /// generation.
    pub fn diversity(&mut self) -> Result<&Array1<f32>> {
        let diversity = match self.diversity.take() {
            Some(diversity) => diversity,
            None => self.simulator.diversity(&self.population)?,
        };
        Ok(self.diversity.insert(diversity))
    }

    /// A fresh phenotype observation of the current population. Never cached.
    pub fn phenotype(&mut self) -> Result<Array2<f32>> {
        self.simulator.phenotype(&self.population)
    }

    /// Replaces the population with the progeny of `spec` and advances one
    /// generation. On error the session is left unchanged.
    pub fn step(&mut self, spec: &CrossSpec) -> Result<&Population> {
        let progeny = self.simulator.cross(&self.population, spec)?;
        self.advance(progeny);
        Ok(&self.population)
    }

    /// Replaces the population with the `k` best individuals under `index`
    /// and advances one generation.
    pub fn select(&mut self, k: usize, index: SelectionIndex) -> Result<&Population> {
        let (selected, _) = self.simulator.select(&self.population, k, index)?;
        self.advance(selected);
        Ok(&self.population)
    }

    /// Restores the founder population.
    pub fn reset(&mut self) -> &Population {
        self.population = self.initial.clone();
        self.generation = 0;
        self.invalidate();
        &self.population
    }

    pub fn is_gebv_cached(&self) -> bool {
        self.gebv.is_some()
    }

    pub fn is_diversity_cached(&self) -> bool {
        self.diversity.is_some()
    }

    fn advance(&mut self, population: Population) {
        self.population = population;
        self.generation += 1;
        self.invalidate();
        debug!(
            generation = self.generation,
            individuals = self.population.dim().0,
            "session advanced"
        );
    }

    fn invalidate(&mut self) {
        self.gebv = None;
        self.diversity = None;
    }
}
