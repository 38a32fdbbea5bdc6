//! Fuzzy inference engine.
//!
//! The engine is split into focused submodules under `src/engine/` while the
//! public paths stay flat (`crate::engine::Engine`, `crate::engine::Inputs`).
//!
//! ## How the parts work together
//!
//! ```text
//! variables + rules ──┐
//!                     │  CompiledRules::new        (compiled_rules.rs)
//!                     │    - resolve names to indices
//!                     │    - reject unknown variables/terms
//!                     └──────────────┬────────────
//!                                    │
//! inputs ── fuzzify (per antecedent) ┤              (inference.rs)
//!                                    v
//!                        fire every rule (min / max)
//!                                    │
//!                                    v
//!                 implication + aggregation          (aggregate.rs)
//!                   - min-clip consequent curves
//!                   - max per term, then max across terms
//!                                    │
//!                                    v
//!                        centroid defuzzification    (variable.rs)
//!                                    │
//!                                    v
//!                        Inference { outputs, flags }
//! ```
//!
//! Everything left of `compute` is configuration: built once, validated once,
//! never mutated. Everything inside `compute` is transient, so an `Engine` can
//! be shared across threads by reference.
//!
//! ## Responsibilities by module
//!
//! - `compiled_rules.rs`: name resolution, validation, the resolved antecedent
//!   tree and its recursive evaluator, and the per-consequent rule index.
//! - `aggregate.rs`: min-clipping and max aggregation over the output grid.
//! - `inference.rs`: the `Engine`, its `Inputs`, and the compute pipeline.
//! - `metrics.rs`: timings and the verbose trace types.

#[path = "engine/aggregate.rs"]
mod aggregate;
#[path = "engine/compiled_rules.rs"]
mod compiled_rules;
#[path = "engine/inference.rs"]
mod inference;
#[path = "engine/metrics.rs"]
mod metrics;

pub use inference::{Engine, Inference, InferenceFlags, Inputs};
pub use metrics::{InferenceMetrics, InferenceTrace, OutputSetTrace, RuleFiring};
