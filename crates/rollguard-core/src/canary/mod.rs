//! Canary health evaluation
//!
//! - **`observation`**: validated p95 latency / error rate readings
//! - **`evaluator`**: the pure rollback decision (`CanaryEvaluator`)
//! - **`gate`**: metrics fetch under retry followed by a decision

mod evaluator;
mod gate;
mod observation;

pub use evaluator::{CanaryEvaluator, RollbackReason, Verdict};
pub use gate::{FileMetricsSource, MetricsSource, RollbackGate};
pub use observation::Observation;
