mod batch;
mod engine;
mod error;
pub mod metrics;
pub mod model;
pub mod optimization;
pub mod params;

pub use batch::Batch;
pub use engine::ScoringEngine;
pub use error::{FactorError, Result};
pub use metrics::{LogSink, LossTerms, MetricsSink, NullSink};
pub use model::{ModelSpec, ModelView, ParameterLayout};
pub use params::{FactorInit, ParameterStore};
