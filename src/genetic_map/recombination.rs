use ndarray::ArrayView1;

use super::GeneticMap;

/// Probability of a crossover immediately before each marker.
///
/// Entry `i` is the raw rate of marker `i - 1`, except at the first marker of
/// every chromosome where it is exactly 0.5: the parental origin of the first
/// marker on a chromosome is a fair coin flip.
#[derive(Debug, Clone, PartialEq)]
pub struct RecombinationVector {
    probabilities: Vec<f32>,
    chromosome_starts: Vec<usize>,
}

/// Probability assigned to the first marker of a chromosome.
pub const CHROMOSOME_START_PROBABILITY: f32 = 0.5;

impl RecombinationVector {
    pub(crate) fn from_map(map: &GeneticMap) -> Self {
        let rates = map.recombination_rates();
        let starts = map.chromosome_starts();

        let mut probabilities: Vec<f32> = std::iter::once(CHROMOSOME_START_PROBABILITY)
            .chain(rates.iter().take(rates.len().saturating_sub(1)).copied())
            .collect();
        for &start in starts {
            probabilities[start] = CHROMOSOME_START_PROBABILITY;
        }

        Self {
            probabilities,
            chromosome_starts: starts.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    pub fn probabilities(&self) -> ArrayView1<'_, f32> {
        ArrayView1::from(&self.probabilities[..])
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.probabilities
    }

    pub fn chromosome_starts(&self) -> &[usize] {
        &self.chromosome_starts
    }
}
