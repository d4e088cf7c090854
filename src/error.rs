//! # Error Types
//!
//! This module defines the error type shared by every part of the simulator.
//! Errors are raised synchronously by the call that detects them; the
//! simulator never retries or partially recovers, since any invalid input is a
//! caller bug.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use breedsim::error::{BreedingError, Result};
//!
//! fn check_traits(trait_names: &[String], h2: &[f32]) -> Result<()> {
//!     if trait_names.len() != h2.len() {
//!         return Err(BreedingError::Configuration(format!(
//!             "expected {} heritability values, got {}",
//!             trait_names.len(),
//!             h2.len()
//!         )));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_traits(&["Yield".to_string()], &[0.5, 0.5]).is_err());
//! ```
//!
//! Using the `ResultExt` trait to add context to errors:
//!
//! ```rust
//! use breedsim::error::{Result, ResultExt};
//!
//! fn parse_rate(cell: &str) -> Result<f32> {
//!     cell.parse::<f32>().context("Failed to parse recombination rate")
//! }
//!
//! assert!(parse_rate("0.25").is_ok());
//! assert!(parse_rate("abc").is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use breedsim::error::{BreedingError, OptionExt};
//!
//! fn first_chromosome(chromosomes: &[i32]) -> breedsim::error::Result<i32> {
//!     chromosomes.first().copied().ok_or_else_breeding(||
//!         BreedingError::DataFormat("genetic map has no markers".to_string())
//!     )
//! }
//! ```

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Represents errors that can occur while building or running a breeding simulation.
#[derive(Error, Debug)]
pub enum BreedingError {
    /// Invalid simulator configuration, e.g. a heritability vector whose length
    /// does not match the number of traits, or an unusable crossing request.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed or incomplete genetic map input.
    #[error("Data format error: {0}")]
    DataFormat(String),

    /// A population array whose shape does not match the loaded genetic map.
    #[error("Shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: String, found: String },

    /// An individual index outside the population.
    #[error("Index {index} is out of bounds for a population of {len} individuals")]
    IndexOutOfBounds { index: usize, len: usize },

    /// An operation that needs individuals received an empty population.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// Error that occurs when an I/O operation fails.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

impl BreedingError {
    /// Builds a `ShapeMismatch` error for a marker axis of the wrong length.
    pub fn marker_mismatch(expected: usize, found: usize) -> Self {
        BreedingError::ShapeMismatch {
            expected: format!("{} markers", expected),
            found: format!("{} markers", found),
        }
    }
}

/// A specialized Result type for breeding simulation operations.
pub type Result<T> = std::result::Result<T, BreedingError>;

/// Extension trait for Result to add context to errors.
///
/// ## Examples
///
/// ```rust
/// use breedsim::error::ResultExt;
/// use std::fs::File;
///
/// fn open_map(path: &str) -> breedsim::error::Result<()> {
///     File::open(path).context("Failed to open genetic map")?;
///     Ok(())
/// }
/// ```
pub trait ResultExt<T, E> {
    /// Adds context to an error, converting it into a `BreedingError::Other`.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| BreedingError::Other(format!("{}: {}", context, e)))
    }
}

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, BreedingError>` using a closure
    /// to generate the error.
    fn ok_or_else_breeding<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> BreedingError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_breeding<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> BreedingError,
    {
        self.ok_or_else(err_fn)
    }
}
