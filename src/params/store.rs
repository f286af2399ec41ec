use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::Rng;

use super::init::FactorInit;
use crate::{
    error::{FactorError, Result},
    model::{ModelSpec, ModelView, ParameterLayout},
};

/// Owns every trainable quantity of the model: both factor tables, both bias
/// tables, and the global bias, stored as one flat buffer interpreted through
/// a `ParameterLayout`.
///
/// Reads go through the lookup methods below; the only write path is
/// `params_mut`, the seam an external optimizer folds gradients through
/// between scoring calls.
#[derive(Debug, Clone)]
pub struct ParameterStore {
    spec: ModelSpec,
    layout: ParameterLayout,
    params: Vec<f32>,
}

impl ParameterStore {
    /// Allocates and initializes a store for `spec` with the default
    /// initialization policy (see `FactorInit::for_spec`).
    ///
    /// # Arguments
    /// * `spec` - Model dimensions and penalty weights.
    /// * `rng` - Source of randomness for the factor tables.
    pub fn init<R: Rng>(spec: ModelSpec, rng: &mut R) -> Result<Self> {
        let params = FactorInit::for_spec(&spec).generate(&spec, rng)?;
        log::debug!(
            n_users = spec.n_users.get(),
            n_items = spec.n_items.get(),
            factors = spec.factors.get(),
            params = params.len();
            "parameter store initialized"
        );
        Ok(Self::assemble(spec, params))
    }

    /// Builds a store around an existing flat buffer, e.g. one restored by an
    /// external driver.
    ///
    /// # Errors
    /// `ShapeMismatch` when `params.len() != spec.num_params()`.
    pub fn from_params(spec: ModelSpec, params: Vec<f32>) -> Result<Self> {
        if params.len() != spec.num_params() {
            return Err(FactorError::ShapeMismatch {
                what: "params",
                got: params.len(),
                expected: spec.num_params(),
            });
        }
        Ok(Self::assemble(spec, params))
    }

    fn assemble(spec: ModelSpec, params: Vec<f32>) -> Self {
        let layout = ParameterLayout::new(&spec);
        layout.validate(params.len());
        Self {
            spec,
            layout,
            params,
        }
    }

    #[inline]
    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    #[inline]
    pub fn layout(&self) -> &ParameterLayout {
        &self.layout
    }

    #[inline]
    pub fn num_params(&self) -> usize {
        self.params.len()
    }

    /// The flat parameter buffer.
    #[inline]
    pub fn params(&self) -> &[f32] {
        &self.params
    }

    /// Mutable access to the flat buffer, the optimizer seam. Scoring never
    /// goes through here.
    #[inline]
    pub fn params_mut(&mut self) -> &mut [f32] {
        &mut self.params
    }

    /// A zero-copy read view for the scoring kernels.
    #[inline]
    pub fn view(&self) -> ModelView<'_> {
        ModelView::new(self.spec, &self.layout, &self.params)
    }

    /// The whole user factor table, `n_users × k`.
    pub fn user_factors(&self) -> ArrayView2<'_, f32> {
        self.table(self.layout.user_factors.clone(), self.spec.n_users.get())
    }

    /// The whole item factor table, `n_items × k`.
    pub fn item_factors(&self) -> ArrayView2<'_, f32> {
        self.table(self.layout.item_factors.clone(), self.spec.n_items.get())
    }

    pub fn user_biases(&self) -> ArrayView1<'_, f32> {
        ArrayView1::from(&self.params[self.layout.user_biases.clone()])
    }

    pub fn item_biases(&self) -> ArrayView1<'_, f32> {
        ArrayView1::from(&self.params[self.layout.item_biases.clone()])
    }

    #[inline]
    pub fn global_bias(&self) -> f32 {
        self.params[self.layout.global_bias]
    }

    /// Gathers the factor rows for `users`, order-preserving.
    ///
    /// # Errors
    /// `OutOfRange` on the first index `>= n_users`.
    pub fn user_vectors(&self, users: &[usize]) -> Result<Array2<f32>> {
        self.check_users(users)?;
        Ok(self.user_factors().select(Axis(0), users))
    }

    /// Gathers the factor rows for `items`, order-preserving.
    ///
    /// # Errors
    /// `OutOfRange` on the first index `>= n_items`.
    pub fn item_vectors(&self, items: &[usize]) -> Result<Array2<f32>> {
        self.check_items(items)?;
        Ok(self.item_factors().select(Axis(0), items))
    }

    /// Gathers the bias scalars for `users`, order-preserving.
    pub fn user_biases_at(&self, users: &[usize]) -> Result<Array1<f32>> {
        self.check_users(users)?;
        Ok(self.user_biases().select(Axis(0), users))
    }

    /// Gathers the bias scalars for `items`, order-preserving.
    pub fn item_biases_at(&self, items: &[usize]) -> Result<Array1<f32>> {
        self.check_items(items)?;
        Ok(self.item_biases().select(Axis(0), items))
    }

    pub(crate) fn check_users(&self, users: &[usize]) -> Result<()> {
        check_indices("user", users, self.spec.n_users.get())
    }

    pub(crate) fn check_items(&self, items: &[usize]) -> Result<()> {
        check_indices("item", items, self.spec.n_items.get())
    }

    fn table(&self, range: std::ops::Range<usize>, rows: usize) -> ArrayView2<'_, f32> {
        let k = self.spec.factors.get();
        ArrayView2::from_shape((rows, k), &self.params[range])
            .expect("layout ranges match the table shapes")
    }
}

fn check_indices(what: &'static str, ids: &[usize], len: usize) -> Result<()> {
    match ids.iter().copied().find(|&id| id >= len) {
        Some(index) => Err(FactorError::OutOfRange { what, index, len }),
        None => Ok(()),
    }
}
