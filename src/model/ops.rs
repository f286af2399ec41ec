//! Math kernels for the factorization model.
//!
//! Kernels are pure functions over validated inputs: boundary APIs check
//! index ranges and shapes before calling in, so preconditions here are
//! plain asserts.

use super::view::ModelView;

/// Scores a batch of (user, item) pairs into `out`, order-preserving.
///
/// Requirements:
/// - `users`, `items`, `out` have the same length
/// - every index is within its table
pub fn predict_batch(view: &ModelView, users: &[usize], items: &[usize], out: &mut [f32]) {
    assert_eq!(users.len(), items.len(), "users and items must match");
    assert_eq!(users.len(), out.len(), "output buffer must match the batch");

    for (slot, (&u, &i)) in out.iter_mut().zip(users.iter().zip(items)) {
        *slot = view.predict_one(u, i);
    }
}

/// Sum of squared entries, the L2 penalty of one parameter table.
///
/// Applied to whole tables, never just the rows a batch touched.
pub fn l2(table: &[f32]) -> f32 {
    table.iter().map(|v| v * v).sum()
}

/// Gradient of the regularized objective with respect to every parameter:
///
/// total = (1/n) * sum_b (r̂_b - r_b)^2
///       + c_vectors * (Σ p² + Σ q²) + c_biases * (Σ b_u² + Σ b_i²)
///
/// Data term (per batch element, e_b = 2 * (r̂_b - r_b) / n):
/// - d/dp_u += e_b * q_i,  d/dq_i += e_b * p_u
/// - d/db_u += e_b,  d/db_i += e_b,  d/db += e_b
///
/// Shrinkage term: `2 * c * w` for EVERY entry of the four tables; rows the
/// batch never touched still shrink. The global bias is not regularized.
///
/// This overwrites `grads` (flat buffer, same layout as the parameters).
pub fn grad_batch(
    view: &ModelView,
    users: &[usize],
    items: &[usize],
    targets: &[f32],
    grads: &mut [f32],
) {
    assert_eq!(users.len(), items.len(), "users and items must match");
    assert_eq!(users.len(), targets.len(), "targets must match the batch");
    assert!(!users.is_empty(), "batch must be non-empty");
    assert_eq!(grads.len(), view.params().len(), "grads must match the parameter buffer");

    grads.fill(0.0);

    let layout = view.layout();
    let k = view.spec().factors.get();
    let scale = 2.0 / users.len() as f32;

    for ((&u, &i), &target) in users.iter().zip(items).zip(targets) {
        let err = scale * (view.predict_one(u, i) - target);

        let p_u = view.user_vector(u);
        let q_i = view.item_vector(i);
        let u_base = layout.user_factors.start + u * k;
        let i_base = layout.item_factors.start + i * k;
        for f in 0..k {
            grads[u_base + f] += err * q_i[f];
            grads[i_base + f] += err * p_u[f];
        }

        grads[layout.user_biases.start + u] += err;
        grads[layout.item_biases.start + i] += err;
        grads[layout.global_bias] += err;
    }

    let params = view.params();
    let two_cv = 2.0 * view.spec().c_vectors;
    for idx in layout.user_factors.clone().chain(layout.item_factors.clone()) {
        grads[idx] += two_cv * params[idx];
    }
    let two_cb = 2.0 * view.spec().c_biases;
    for idx in layout.user_biases.clone().chain(layout.item_biases.clone()) {
        grads[idx] += two_cb * params[idx];
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;
    use crate::model::{layout::ParameterLayout, spec::ModelSpec};

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn grad_matches_expected_single_element_case() {
        // One user, one item, k=1: r̂ = p*q + b + b_u + b_i
        let spec = ModelSpec::new(nz(1), nz(1), nz(1), 0.0, 0.0);
        let layout = ParameterLayout::new(&spec);
        // p=2, q=3, b_u=0, b_i=0, b=1 => r̂ = 7
        let params = [2.0_f32, 3.0, 0.0, 0.0, 1.0];
        let view = ModelView::new(spec, &layout, &params);

        let mut grads = [0.0_f32; 5];
        grad_batch(&view, &[0], &[0], &[5.0], &mut grads);

        // err = 2 * (7 - 5) / 1 = 4
        // dp = err*q = 12, dq = err*p = 8, biases and global all err
        assert!((grads[0] - 12.0).abs() < 1e-5);
        assert!((grads[1] - 8.0).abs() < 1e-5);
        assert!((grads[2] - 4.0).abs() < 1e-5);
        assert!((grads[3] - 4.0).abs() < 1e-5);
        assert!((grads[4] - 4.0).abs() < 1e-5);
    }

    #[test]
    fn shrinkage_reaches_rows_the_batch_never_touched() {
        let spec = ModelSpec::new(nz(3), nz(2), nz(2), 0.5, 0.25);
        let layout = ParameterLayout::new(&spec);
        let params: Vec<f32> = (0..spec.num_params()).map(|i| i as f32 * 0.1).collect();
        let view = ModelView::new(spec, &layout, &params);

        let mut grads = vec![0.0_f32; spec.num_params()];
        // Batch touches user 0 and item 0 only.
        grad_batch(&view, &[0], &[0], &[1.0], &mut grads);

        // User 2's factor row never appears in the batch: its gradient is
        // exactly the shrinkage term 2 * c_vectors * w.
        let k = spec.factors.get();
        let base = layout.user_factors.start + 2 * k;
        for f in 0..k {
            let expected = 2.0 * 0.5 * params[base + f];
            assert!((grads[base + f] - expected).abs() < 1e-6);
        }

        // Same for user 2's bias with the bias weight.
        let bias_idx = layout.user_biases.start + 2;
        let expected = 2.0 * 0.25 * params[bias_idx];
        assert!((grads[bias_idx] - expected).abs() < 1e-6);
    }

    #[test]
    fn l2_of_a_zero_table_is_exactly_zero() {
        assert_eq!(l2(&[0.0; 16]), 0.0);
    }

    #[test]
    fn predict_batch_preserves_order() {
        let spec = ModelSpec::new(nz(2), nz(2), nz(1), 0.0, 0.0);
        let layout = ParameterLayout::new(&spec);
        // p = [1, 2], q = [3, 4], all biases and global zero
        let params = [1.0_f32, 2.0, 3.0, 4.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let view = ModelView::new(spec, &layout, &params);

        let mut out = [0.0_f32; 2];
        predict_batch(&view, &[1, 0], &[0, 1], &mut out);
        assert_eq!(out, [6.0, 4.0]);
    }
}
