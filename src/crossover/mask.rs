use crate::genetic_map::RecombinationVector;
use crate::rng::RandomNumberGenerator;

/// Parental haplotype inherited at each marker during one meiosis.
///
/// `false` selects haplotype 0 of the parent, `true` haplotype 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossoverMask(Vec<bool>);

impl CrossoverMask {
    /// Builds a mask from crossover events: the mask is the inclusive running
    /// parity of the events, so every event switches the inherited haplotype
    /// from that marker on.
    ///
    /// ```rust
    /// use breedsim::crossover::CrossoverMask;
    ///
    /// let mask = CrossoverMask::from_events([false, true, false, true]);
    /// assert_eq!(mask.as_slice(), [false, true, true, false]);
    /// ```
    pub fn from_events<I>(events: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        Self(
            events
                .into_iter()
                .scan(false, |parity, event| {
                    *parity ^= event;
                    Some(*parity)
                })
                .collect(),
        )
    }

    /// Samples one meiosis: a crossover happens before marker `i` when a
    /// uniform draw falls below `recombination[i]`.
    pub fn sample(recombination: &RecombinationVector, rng: &mut RandomNumberGenerator) -> Self {
        let draws = rng.fetch_unit(recombination.len());
        Self::from_events(
            draws
                .into_iter()
                .zip(recombination.as_slice())
                .map(|(draw, &probability)| draw < probability),
        )
    }

    /// Recovers the crossover events the mask was built from.
    pub fn events(&self) -> Vec<bool> {
        std::iter::once(&false)
            .chain(self.0.iter())
            .zip(self.0.iter())
            .map(|(previous, current)| previous ^ current)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &bool> {
        self.0.iter()
    }
}

impl From<Vec<bool>> for CrossoverMask {
    /// Wraps an explicit haplotype selection; no scan is applied.
    fn from(selection: Vec<bool>) -> Self {
        Self(selection)
    }
}
