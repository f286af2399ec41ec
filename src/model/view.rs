use super::{layout::ParameterLayout, spec::ModelSpec};

/// A read-only view over a flat parameter buffer.
///
/// The view *does not own* parameters. It interprets them via
/// `ParameterLayout`. Row indices are not re-checked here; boundary APIs
/// validate them before constructing lookups.
#[derive(Debug, Clone, Copy)]
pub struct ModelView<'a> {
    spec: ModelSpec,
    layout: &'a ParameterLayout,
    params: &'a [f32],
}

impl<'a> ModelView<'a> {
    pub fn new(spec: ModelSpec, layout: &'a ParameterLayout, params: &'a [f32]) -> Self {
        debug_assert!(params.len() > layout.global_bias);
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
    pub fn layout(&self) -> &'a ParameterLayout {
        self.layout
    }

    #[inline]
    pub fn params(&self) -> &'a [f32] {
        self.params
    }

    /// Embedding row `p_u`.
    #[inline]
    pub fn user_vector(&self, user: usize) -> &'a [f32] {
        let k = self.spec.factors.get();
        let base = self.layout.user_factors.start + user * k;
        &self.params[base..base + k]
    }

    /// Embedding row `q_i`.
    #[inline]
    pub fn item_vector(&self, item: usize) -> &'a [f32] {
        let k = self.spec.factors.get();
        let base = self.layout.item_factors.start + item * k;
        &self.params[base..base + k]
    }

    #[inline]
    pub fn user_bias(&self, user: usize) -> f32 {
        self.params[self.layout.user_biases.start + user]
    }

    #[inline]
    pub fn item_bias(&self, item: usize) -> f32 {
        self.params[self.layout.item_biases.start + item]
    }

    #[inline]
    pub fn global_bias(&self) -> f32 {
        self.params[self.layout.global_bias]
    }

    /// r̂ = p_u · q_i + b + b_u + b_i
    #[inline]
    pub fn predict_one(&self, user: usize, item: usize) -> f32 {
        let interaction: f32 = self
            .user_vector(user)
            .iter()
            .zip(self.item_vector(item))
            .map(|(p, q)| p * q)
            .sum();
        interaction + self.global_bias() + self.user_bias(user) + self.item_bias(item)
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn fixture() -> (ModelSpec, ParameterLayout, Vec<f32>) {
        let spec = ModelSpec::new(nz(2), nz(2), nz(2), 0.0, 0.0);
        let layout = ParameterLayout::new(&spec);
        // user0=[1,0] user1=[2,3] item0=[0,1] item1=[1,1]
        // user biases [0.5, 0] item biases [0.25, 0] global 0
        let params = vec![
            1.0, 0.0, 2.0, 3.0, // user factors
            0.0, 1.0, 1.0, 1.0, // item factors
            0.5, 0.0, // user biases
            0.25, 0.0, // item biases
            0.0, // global bias
        ];
        (spec, layout, params)
    }

    #[test]
    fn rows_follow_the_layout() {
        let (spec, layout, params) = fixture();
        let view = ModelView::new(spec, &layout, &params);

        assert_eq!(view.user_vector(1), &[2.0, 3.0]);
        assert_eq!(view.item_vector(0), &[0.0, 1.0]);
        assert_eq!(view.user_bias(0), 0.5);
        assert_eq!(view.item_bias(1), 0.0);
        assert_eq!(view.global_bias(), 0.0);
    }

    #[test]
    fn predict_is_dot_plus_biases() {
        let (spec, layout, params) = fixture();
        let view = ModelView::new(spec, &layout, &params);

        // user0 · item0 = 0, biases 0.5 + 0.25
        assert!((view.predict_one(0, 0) - 0.75).abs() < 1e-6);
        // user1 · item1 = 5, biases 0.0 + 0.0
        assert!((view.predict_one(1, 1) - 5.0).abs() < 1e-6);
    }
}
