/// A destination for named scalar training diagnostics.
///
/// Sinks receive `(name, value, step)` tuples; a model without a sink simply
/// records nothing. Sinks never influence the computation.
pub trait MetricsSink {
    fn record(&mut self, name: &'static str, value: f32, step: u64);
}

/// Discards every metric.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl MetricsSink for NullSink {
    fn record(&mut self, _name: &'static str, _value: f32, _step: u64) {}
}

/// Forwards every metric to the `log` facade at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl MetricsSink for LogSink {
    fn record(&mut self, name: &'static str, value: f32, step: u64) {
        log::debug!(metric = name, value = value as f64, step = step; "metric");
    }
}

/// The decomposed objective of one loss evaluation.
///
/// Field names match the scalar names the reference training dashboards
/// chart, so drivers can forward them verbatim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossTerms {
    /// Mean squared error over the batch.
    pub loss_mse: f32,
    /// L2 penalty on the user factor table, weighted by `c_vectors`.
    pub prior_user: f32,
    /// L2 penalty on the item factor table, weighted by `c_vectors`.
    pub prior_item: f32,
    /// L2 penalty on the user bias table, weighted by `c_biases`.
    pub prior_bias_user: f32,
    /// L2 penalty on the item bias table, weighted by `c_biases`.
    pub prior_bias_item: f32,
    /// Sum of all of the above, the trained objective.
    pub total: f32,
}

impl LossTerms {
    /// Reports every term to `sink`, tagged with `step`.
    pub fn report(&self, sink: &mut impl MetricsSink, step: u64) {
        sink.record("loss_mse", self.loss_mse, step);
        sink.record("prior_user", self.prior_user, step);
        sink.record("prior_item", self.prior_item, step);
        sink.record("prior_bias_user", self.prior_bias_user, step);
        sink.record("prior_bias_item", self.prior_bias_item, step);
        sink.record("total", self.total, step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CaptureSink(Vec<(&'static str, f32, u64)>);

    impl MetricsSink for CaptureSink {
        fn record(&mut self, name: &'static str, value: f32, step: u64) {
            self.0.push((name, value, step));
        }
    }

    #[test]
    fn report_emits_every_named_term_once() {
        let terms = LossTerms {
            loss_mse: 1.0,
            prior_user: 2.0,
            prior_item: 3.0,
            prior_bias_user: 4.0,
            prior_bias_item: 5.0,
            total: 15.0,
        };

        let mut sink = CaptureSink::default();
        terms.report(&mut sink, 9);

        let names: Vec<_> = sink.0.iter().map(|(n, _, _)| *n).collect();
        assert_eq!(
            names,
            [
                "loss_mse",
                "prior_user",
                "prior_item",
                "prior_bias_user",
                "prior_bias_item",
                "total"
            ]
        );
        assert!(sink.0.iter().all(|&(_, _, step)| step == 9));
    }
}
