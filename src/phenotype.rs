//! # PhenotypeSimulator
//!
//! Observed phenotypes mix the genetic signal with environmental noise
//! according to each trait's heritability `h2`:
//!
//! ```text
//! observed = h2 · GEBV + (1 − h2) · sqrt(var_GEBV) · noise,   noise ~ N(0, 1)
//! ```
//!
//! One noise draw is taken per trait on every call and shared by all
//! individuals of that call, so phenotypes are recomputed, never cached, and
//! two calls on the same population differ unless `h2 = 1`.

use ndarray::{Array1, Array2, ArrayView3, Axis};

use crate::{
    error::{BreedingError, Result},
    gebv::BreedingValueModel,
    rng::RandomNumberGenerator,
};

#[derive(Debug, Clone)]
pub struct PhenotypeSimulator {
    h2: Array1<f32>,
    /// `sqrt(var_GEBV)` per trait
    genetic_sd: Array1<f32>,
}

impl PhenotypeSimulator {
    /// Creates a simulator for the traits of `model`.
    ///
    /// # Errors
    ///
    /// Returns `BreedingError::Configuration` if `h2` does not hold exactly one
    /// value in `[0, 1]` per trait.
    pub fn new(model: &BreedingValueModel, h2: &[f32]) -> Result<Self> {
        if h2.len() != model.n_traits() {
            return Err(BreedingError::Configuration(format!(
                "Heritability has {} values but the model has {} traits",
                h2.len(),
                model.n_traits()
            )));
        }
        if let Some(bad) = h2.iter().find(|h| !(0.0..=1.0).contains(*h)) {
            return Err(BreedingError::Configuration(format!(
                "Heritability must lie in [0, 1], got {}",
                bad
            )));
        }

        Ok(Self {
            h2: Array1::from(h2.to_vec()),
            genetic_sd: model.var().mapv(f32::sqrt),
        })
    }

    pub fn h2(&self) -> &Array1<f32> {
        &self.h2
    }

    /// Combines precomputed breeding values (`[individual, trait]`) with fresh
    /// environmental noise.
    pub fn from_gebv(&self, gebv: &Array2<f32>, rng: &mut RandomNumberGenerator) -> Array2<f32> {
        let noise = Array1::from(rng.fetch_standard_normal(self.h2.len()));
        let environment = (1.0 - &self.h2) * &self.genetic_sd * noise;
        let mut phenotype = gebv * &self.h2;
        for mut row in phenotype.axis_iter_mut(Axis(0)) {
            row += &environment;
        }
        phenotype
    }

    /// Simulates one observation of every individual's phenotype.
    pub fn phenotype(
        &self,
        model: &BreedingValueModel,
        population: &ArrayView3<'_, bool>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Array2<f32>> {
        let gebv = model.evaluate(population)?;
        Ok(self.from_gebv(&gebv, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::Population;
    use ndarray::array;

    fn model() -> BreedingValueModel {
        BreedingValueModel::new(array![[1.0, 0.5], [-0.5, 2.0], [0.25, -1.0]])
    }

    fn population() -> Population {
        Population::from_shape_fn((4, 3, 2), |(i, m, h)| (i * 3 + m + h) % 2 == 0)
    }

    #[test]
    fn test_full_heritability_equals_gebv() {
        let model = model();
        let simulator = PhenotypeSimulator::new(&model, &[1.0, 1.0]).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(1);
        let gebv = model.evaluate(&population().view()).unwrap();

        for _ in 0..10 {
            let phenotype = simulator
                .phenotype(&model, &population().view(), &mut rng)
                .unwrap();
            assert_eq!(phenotype, gebv);
        }
    }

    #[test]
    fn test_noise_is_shared_within_a_call() {
        let model = model();
        let simulator = PhenotypeSimulator::new(&model, &[0.0, 0.5]).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(2);
        let phenotype = simulator
            .phenotype(&model, &population().view(), &mut rng)
            .unwrap();

        // With h2 = 0 the trait is pure noise, identical across individuals.
        let first = phenotype[[0, 0]];
        assert!(phenotype.column(0).iter().all(|&p| p == first));
    }

    #[test]
    fn test_calls_differ_without_full_heritability() {
        let model = model();
        let simulator = PhenotypeSimulator::new(&model, &[0.3, 0.3]).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(3);
        let a = simulator.phenotype(&model, &population().view(), &mut rng).unwrap();
        let b = simulator.phenotype(&model, &population().view(), &mut rng).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_rejects_h2_length_mismatch() {
        assert!(matches!(
            PhenotypeSimulator::new(&model(), &[0.5]),
            Err(BreedingError::Configuration(_))
        ));
    }

    #[test]
    fn test_rejects_h2_out_of_range() {
        assert!(matches!(
            PhenotypeSimulator::new(&model(), &[0.5, -0.1]),
            Err(BreedingError::Configuration(_))
        ));
    }
}
