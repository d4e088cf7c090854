use crate::error::{BreedingError, Result};

/// Which individuals to cross and how many offspring each cross yields.
///
/// Progeny are laid out pair by pair, in pair order, with the offspring of a
/// pair stored consecutively. The first individual of a pair contributes
/// haplotype 0 of every offspring, the second haplotype 1.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossSpec {
    pairs: Vec<(usize, usize)>,
    n_offspring: usize,
}

impl CrossSpec {
    /// Creates a crossing specification.
    ///
    /// # Errors
    ///
    /// Returns `BreedingError::Configuration` if there are no pairs,
    /// `n_offspring` is zero, or the total progeny count does not fit in a
    /// `usize`.
    pub fn new(pairs: Vec<(usize, usize)>, n_offspring: usize) -> Result<Self> {
        if pairs.is_empty() {
            return Err(BreedingError::Configuration(
                "At least one pair must be crossed".to_string(),
            ));
        }
        if n_offspring == 0 {
            return Err(BreedingError::Configuration(
                "Number of offspring cannot be zero".to_string(),
            ));
        }
        if pairs.len().checked_mul(n_offspring).is_none() {
            return Err(BreedingError::Configuration(format!(
                "{} pairs with {} offspring each overflow the progeny count",
                pairs.len(),
                n_offspring
            )));
        }
        Ok(Self { pairs, n_offspring })
    }

    /// One offspring per pair.
    pub fn single(pairs: Vec<(usize, usize)>) -> Result<Self> {
        Self::new(pairs, 1)
    }

    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    pub fn n_offspring(&self) -> usize {
        self.n_offspring
    }

    /// Total number of individuals the cross produces.
    pub fn n_progeny(&self) -> usize {
        self.pairs.len() * self.n_offspring
    }

    /// Checks every parent index against a population of `len` individuals.
    pub fn validate(&self, len: usize) -> Result<()> {
        match self
            .pairs
            .iter()
            .flat_map(|&(a, b)| [a, b])
            .find(|&index| index >= len)
        {
            Some(index) => Err(BreedingError::IndexOutOfBounds { index, len }),
            None => Ok(()),
        }
    }

    /// Parents of every progeny, in output order.
    pub(crate) fn progeny_parents(&self) -> impl Iterator<Item = [usize; 2]> + '_ {
        self.pairs
            .iter()
            .flat_map(move |&(a, b)| std::iter::repeat([a, b]).take(self.n_offspring))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_n_progeny() {
        let spec = CrossSpec::new(vec![(0, 1), (2, 3), (1, 1)], 4).unwrap();
        assert_eq!(spec.n_progeny(), 12);
    }

    #[test]
    fn test_rejects_empty_and_zero() {
        assert!(matches!(
            CrossSpec::new(vec![], 2),
            Err(BreedingError::Configuration(_))
        ));
        assert!(matches!(
            CrossSpec::new(vec![(0, 1)], 0),
            Err(BreedingError::Configuration(_))
        ));
    }

    #[test]
    fn test_rejects_progeny_count_overflow() {
        assert!(matches!(
            CrossSpec::new(vec![(0, 1), (1, 0)], usize::MAX),
            Err(BreedingError::Configuration(_))
        ));
        let spec = CrossSpec::new(vec![(0, 1)], usize::MAX).unwrap();
        assert_eq!(spec.n_progeny(), usize::MAX);
    }

    #[test]
    fn test_validate_indices() {
        let spec = CrossSpec::single(vec![(0, 1), (1, 5)]).unwrap();
        assert!(spec.validate(6).is_ok());
        match spec.validate(5) {
            Err(BreedingError::IndexOutOfBounds { index, len }) => {
                assert_eq!(index, 5);
                assert_eq!(len, 5);
            }
            _ => panic!("Expected IndexOutOfBounds error"),
        }
    }

    #[test]
    fn test_progeny_parents_order() {
        let spec = CrossSpec::new(vec![(0, 1), (2, 3)], 2).unwrap();
        let parents: Vec<_> = spec.progeny_parents().collect();
        assert_eq!(parents, vec![[0, 1], [0, 1], [2, 3], [2, 3]]);
    }
}
