//! Inference metrics and traces.
//!
//! `Engine::compute` returns only crisp outputs and flags. The verbose path,
//! `Engine::compute_verbose`, also returns what each stage produced, for
//! reports, plots and debugging a rule set.
//!
//! Timings come from `std::time::Instant` and are only indicative: a single
//! inference over the default model takes microseconds.

use super::inference::Inference;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Per-stage timings for one inference.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct InferenceMetrics {
    pub fuzzify: Duration,
    pub rules: Duration,
    pub aggregate: Duration,
    pub defuzzify: Duration,
    pub total: Duration,
}

/// Firing strength of a single rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleFiring {
    pub rule: String,
    pub strength: f64,
    /// `"variable.term"` the rule concludes on.
    pub consequent: String,
}

/// Aggregated output set of one consequent variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputSetTrace {
    /// Universe sample points.
    pub points: Vec<f64>,
    /// Per-term clipped sets, keyed by term name.
    pub per_term: BTreeMap<String, Vec<f64>>,
    pub aggregated: Vec<f64>,
}

/// Everything an inference computed, stage by stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceTrace {
    pub inference: Inference,
    /// Input variable -> term -> degree.
    pub fuzzified: BTreeMap<String, BTreeMap<String, f64>>,
    /// In rule order.
    pub firings: Vec<RuleFiring>,
    pub output_sets: BTreeMap<String, OutputSetTrace>,
    pub metrics: InferenceMetrics,
}
