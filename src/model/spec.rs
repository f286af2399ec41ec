use std::num::NonZeroUsize;

/// Hyperparameters of the biased factorization model.
///
/// Fixed at construction; the trainable state lives in the parameter buffer,
/// not here. `factors` is the width of every embedding vector, `c_vectors`
/// and `c_biases` weight the L2 penalties on the embedding and bias tables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelSpec {
    pub n_users: NonZeroUsize,
    pub n_items: NonZeroUsize,
    pub factors: NonZeroUsize,
    pub c_vectors: f32,
    pub c_biases: f32,
}

impl ModelSpec {
    /// Creates a new `ModelSpec`.
    ///
    /// # Arguments
    /// * `n_users` - Number of rows in the user tables.
    /// * `n_items` - Number of rows in the item tables.
    /// * `factors` - Embedding width shared by both factor tables.
    /// * `c_vectors` - L2 weight applied to the whole of each factor table.
    /// * `c_biases` - L2 weight applied to the whole of each bias table.
    pub fn new(
        n_users: NonZeroUsize,
        n_items: NonZeroUsize,
        factors: NonZeroUsize,
        c_vectors: f32,
        c_biases: f32,
    ) -> Self {
        Self {
            n_users,
            n_items,
            factors,
            c_vectors,
            c_biases,
        }
    }

    /// Total number of scalars in the flat parameter buffer:
    /// two factor tables, two bias tables, one global bias.
    pub fn num_params(&self) -> usize {
        let (n_users, n_items) = (self.n_users.get(), self.n_items.get());
        let k = self.factors.get();
        n_users * k + n_items * k + n_users + n_items + 1
    }
}
