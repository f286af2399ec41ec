use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::{
    error::{FactorError, Result},
    model::{ModelSpec, ParameterLayout},
};

/// Initial-value policy for the parameter buffer.
///
/// Factor tables are drawn from a centered normal; bias tables start at
/// zero so the first predictions reduce to `global_bias + p_u · q_i`; the
/// global bias starts at `global_bias`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorInit {
    /// Standard deviation of the factor-table entries.
    pub std_dev: f32,
    /// Starting value of the single global-bias slot.
    pub global_bias: f32,
}

impl FactorInit {
    /// Default policy for `spec`: `std_dev = 1/sqrt(k)`, which keeps the
    /// initial interaction score at unit-order variance regardless of the
    /// embedding width, and a unit global bias.
    pub fn for_spec(spec: &ModelSpec) -> Self {
        Self {
            std_dev: 1.0 / (spec.factors.get() as f32).sqrt(),
            global_bias: 1.0,
        }
    }

    /// Generates a full parameter buffer for `spec`.
    ///
    /// # Arguments
    /// * `spec` - Model dimensions the buffer is laid out for.
    /// * `rng` - Source of randomness for the factor tables.
    ///
    /// # Errors
    /// `InvalidInput` if `std_dev` is negative or not finite.
    pub fn generate<R: Rng>(&self, spec: &ModelSpec, rng: &mut R) -> Result<Vec<f32>> {
        let normal = Normal::new(0.0, self.std_dev)
            .map_err(|_| FactorError::InvalidInput("factor std_dev must be finite and non-negative"))?;

        let layout = ParameterLayout::new(spec);
        let mut params = vec![0.0_f32; spec.num_params()];

        for slot in &mut params[layout.user_factors.clone()] {
            *slot = normal.sample(rng);
        }
        for slot in &mut params[layout.item_factors.clone()] {
            *slot = normal.sample(rng);
        }
        params[layout.global_bias] = self.global_bias;

        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn biases_start_at_zero_and_global_at_one() {
        let spec = ModelSpec::new(nz(4), nz(3), nz(2), 0.0, 0.0);
        let layout = ParameterLayout::new(&spec);
        let mut rng = StdRng::seed_from_u64(7);

        let params = FactorInit::for_spec(&spec).generate(&spec, &mut rng).unwrap();

        assert!(params[layout.user_biases.clone()].iter().all(|&b| b == 0.0));
        assert!(params[layout.item_biases.clone()].iter().all(|&b| b == 0.0));
        assert_eq!(params[layout.global_bias], 1.0);
    }

    #[test]
    fn same_seed_same_buffer() {
        let spec = ModelSpec::new(nz(5), nz(5), nz(3), 0.0, 0.0);
        let init = FactorInit::for_spec(&spec);

        let a = init.generate(&spec, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = init.generate(&spec, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_non_finite_scale() {
        let spec = ModelSpec::new(nz(2), nz(2), nz(2), 0.0, 0.0);
        let init = FactorInit {
            std_dev: f32::NAN,
            global_bias: 1.0,
        };
        let res = init.generate(&spec, &mut StdRng::seed_from_u64(0));
        assert!(matches!(res, Err(FactorError::InvalidInput(_))));
    }

    #[test]
    fn scale_follows_embedding_width() {
        let spec = ModelSpec::new(nz(2), nz(2), nz(4), 0.0, 0.0);
        let init = FactorInit::for_spec(&spec);
        assert!((init.std_dev - 0.5).abs() < 1e-6);
    }
}
