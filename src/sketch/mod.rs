//! Traffic sketching: frequency estimation and bounded Top-K retention.
//!
//! Ingestion is a tight sequential loop over one [`TopFlowSketch`] per trace:
//! the [`FrequencyEstimator`] turns each key occurrence into an approximate
//! count signal, and the [`TopKRetainer`] decides whether that signal earns
//! the flow a place among the K heaviest. Nothing feeds back: the retainer
//! only influences the estimator through the growth cap derived from its
//! current minimum.

pub mod estimator;
pub mod retainer;
pub mod top_flows;

pub use estimator::{COLUMN_SLACK, ESTIMATOR_ROWS, FrequencyEstimator};
pub use retainer::{BUCKET_SCAN_LIMIT, MAX_LOG_COUNT, TopKRetainer};
pub use top_flows::TopFlowSketch;
