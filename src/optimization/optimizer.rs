use crate::error::Result;

/// Defines the strategy for folding a gradient into the flat parameter
/// buffer.
///
/// Implementations are the only writers of a `ParameterStore` between
/// scoring calls; the scoring side never mutates.
pub trait Optimizer {
    /// Applies one update step in place.
    ///
    /// # Arguments
    /// * `grad` - Gradient of the objective with respect to every parameter.
    /// * `params` - The flat parameter buffer to update.
    ///
    /// # Errors
    /// `ShapeMismatch` when `grad` and `params` disagree in length.
    fn update_params(&mut self, grad: &[f32], params: &mut [f32]) -> Result<()>;
}
