use log::debug;
use ndarray::{Array1, ArrayView1};

use crate::{
    batch::Batch,
    error::{FactorError, Result},
    metrics::{LossTerms, MetricsSink, NullSink},
    model::ops,
    params::ParameterStore,
};

/// Scoring and objective engine for the factorization model.
///
/// Every method is a pure function of the store's current parameters and its
/// inputs; the engine itself keeps no model state. The only thing that
/// advances is a diagnostic step counter, bumped once per `loss` call and
/// used solely to tag metrics; never shared, never global.
pub struct ScoringEngine<S = NullSink> {
    sink: Option<S>,
    step: u64,
}

impl ScoringEngine {
    /// An engine that records no metrics.
    pub fn new() -> Self {
        Self {
            sink: None,
            step: 0,
        }
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: MetricsSink> ScoringEngine<S> {
    /// An engine that reports each loss evaluation's terms to `sink`.
    pub fn with_sink(sink: S) -> Self {
        Self {
            sink: Some(sink),
            step: 0,
        }
    }

    /// The number of loss evaluations performed so far.
    #[inline]
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Scores a batch of (user, item) pairs, order-preserving. A single
    /// element is just the `B = 1` case of the same path.
    ///
    /// # Arguments
    /// * `store` - Current parameters.
    /// * `users` - User index per batch element.
    /// * `items` - Item index per batch element, parallel to `users`.
    ///
    /// # Errors
    /// - `ShapeMismatch` when the index slices disagree in length.
    /// - `OutOfRange` when any index falls outside its table.
    pub fn predict(
        &self,
        store: &ParameterStore,
        users: &[usize],
        items: &[usize],
    ) -> Result<Array1<f32>> {
        if items.len() != users.len() {
            return Err(FactorError::ShapeMismatch {
                what: "items",
                got: items.len(),
                expected: users.len(),
            });
        }
        store.check_users(users)?;
        store.check_items(items)?;

        let mut out = vec![0.0_f32; users.len()];
        ops::predict_batch(&store.view(), users, items, &mut out);
        Ok(Array1::from(out))
    }

    /// The regularized training objective for one batch.
    ///
    /// Returns the total; the decomposition is available via `loss_terms`.
    /// Non-finite values are not caught here; the driver decides what to do
    /// with a NaN/Inf step.
    pub fn loss(
        &mut self,
        store: &ParameterStore,
        predictions: ArrayView1<f32>,
        targets: &[f32],
    ) -> Result<f32> {
        Ok(self.loss_terms(store, predictions, targets)?.total)
    }

    /// Like `loss`, but returns every term: batch MSE plus the four
    /// whole-table L2 priors. Each call reports the terms to the sink (when
    /// present) tagged with the current step, then advances the counter.
    ///
    /// # Errors
    /// - `ShapeMismatch` when `targets` is not parallel to `predictions`.
    /// - `InvalidInput` when the batch is empty.
    pub fn loss_terms(
        &mut self,
        store: &ParameterStore,
        predictions: ArrayView1<f32>,
        targets: &[f32],
    ) -> Result<LossTerms> {
        if targets.len() != predictions.len() {
            return Err(FactorError::ShapeMismatch {
                what: "targets",
                got: targets.len(),
                expected: predictions.len(),
            });
        }
        if predictions.is_empty() {
            return Err(FactorError::InvalidInput("batch must be non-empty"));
        }

        let loss_mse = predictions
            .iter()
            .zip(targets)
            .map(|(p, t)| {
                let e = p - t;
                e * e
            })
            .sum::<f32>()
            / predictions.len() as f32;

        let spec = store.spec();
        let layout = store.layout();
        let params = store.params();
        let prior_user = spec.c_vectors * ops::l2(&params[layout.user_factors.clone()]);
        let prior_item = spec.c_vectors * ops::l2(&params[layout.item_factors.clone()]);
        let prior_bias_user = spec.c_biases * ops::l2(&params[layout.user_biases.clone()]);
        let prior_bias_item = spec.c_biases * ops::l2(&params[layout.item_biases.clone()]);

        let terms = LossTerms {
            loss_mse,
            prior_user,
            prior_item,
            prior_bias_user,
            prior_bias_item,
            total: loss_mse + prior_user + prior_item + prior_bias_user + prior_bias_item,
        };

        if let Some(sink) = self.sink.as_mut() {
            terms.report(sink, self.step);
        }
        debug!(step = self.step, total = terms.total as f64; "objective evaluated");
        self.step += 1;

        Ok(terms)
    }

    /// Writes the gradient of the total objective into `grads`, the flat
    /// buffer an external optimizer folds into `params_mut`. Overwrites the
    /// buffer; every table entry receives its shrinkage term whether or not
    /// the batch touched it.
    ///
    /// # Errors
    /// - `ShapeMismatch` when `grads` does not match the parameter buffer.
    /// - `OutOfRange` when any batch index falls outside its table.
    pub fn grad_batch(
        &self,
        store: &ParameterStore,
        batch: &Batch<'_>,
        grads: &mut [f32],
    ) -> Result<()> {
        if grads.len() != store.num_params() {
            return Err(FactorError::ShapeMismatch {
                what: "grads",
                got: grads.len(),
                expected: store.num_params(),
            });
        }
        store.check_users(batch.users())?;
        store.check_items(batch.items())?;

        ops::grad_batch(
            &store.view(),
            batch.users(),
            batch.items(),
            batch.targets(),
            grads,
        );
        Ok(())
    }
}
