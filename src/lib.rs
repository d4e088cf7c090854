pub mod config;
pub mod crossover;
pub mod error;
pub mod gebv;
pub mod genetic_map;
pub mod phenotype;
pub mod population;
pub mod rng;
pub mod selection;
pub mod session;
pub mod simulator;
pub mod statistics;

// Re-export commonly used types for convenience
pub use config::SimulatorConfig;
pub use crossover::{CrossSpec, CrossoverEngine, CrossoverMask};
pub use error::{BreedingError, OptionExt, Result, ResultExt};
pub use gebv::{BreedingValueModel, GebvStatistics};
pub use genetic_map::{GeneticMap, MarkerRecord, RecombinationVector};
pub use population::Population;
pub use rng::RandomNumberGenerator;
pub use session::BreedingSession;
pub use simulator::BreedingSimulator;
