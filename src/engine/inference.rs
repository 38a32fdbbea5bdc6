//! The compute pipeline.
//!
//! ```text
//! Inputs ──▶ validate ──▶ fuzzify ──▶ fire rules ──▶ aggregate ──▶ defuzzify
//!              │                                                     │
//!              └─ MissingInput / UnknownInput / NonFiniteInput        └─ Inference
//! ```
//!
//! `Engine` owns its variables and rules and never mutates them after `new`.
//! Every intermediate (degrees, strengths, output sets) is local to one call.

use super::aggregate::{OutputSet, aggregate};
use super::compiled_rules::CompiledRules;
use super::metrics::{InferenceMetrics, InferenceTrace, OutputSetTrace, RuleFiring};
use crate::Rule;
use crate::error::{ConfigError, InferenceError};
use crate::variable::{CrispOutput, LinguisticVariable, Role};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

bitflags::bitflags! {
    /// Conditions observed during an inference that are not errors.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    #[serde(transparent)]
    pub struct InferenceFlags: u8 {
        /// No rule concluding on some output fired with a positive strength.
        const UNDEFINED_OUTPUT       = 1 << 0;
        /// At least one input lay outside its variable's universe.
        const INPUT_OUTSIDE_UNIVERSE = 1 << 1;
    }
}

/// Crisp input values keyed by antecedent variable name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inputs(BTreeMap<String, f64>);

impl Inputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, variable: impl Into<String>, value: f64) -> Self {
        self.set(variable, value);
        self
    }

    pub fn set(&mut self, variable: impl Into<String>, value: f64) {
        self.0.insert(variable.into(), value);
    }

    pub fn get(&self, variable: &str) -> Option<f64> {
        self.0.get(variable).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Inputs {
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        Inputs(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Result of [`Engine::compute`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inference {
    /// Crisp value per consequent variable.
    pub outputs: BTreeMap<String, CrispOutput>,
    pub flags: InferenceFlags,
}

impl Inference {
    pub fn output(&self, variable: &str) -> Option<CrispOutput> {
        self.outputs.get(variable).copied()
    }
}

/// Mamdani engine: min AND, max OR, min implication, max aggregation,
/// centroid defuzzification.
///
/// Usage: build once with [`Engine::new`], then call [`Engine::compute`] any
/// number of times, from any number of threads.
#[derive(Debug)]
pub struct Engine {
    variables: Vec<LinguisticVariable>,
    rules: Vec<Rule>,
    compiled: CompiledRules,
    /// Consequent term curves sampled on their universe: `[variable][term][point]`.
    /// Empty for antecedent variables.
    curves: Vec<Vec<Vec<f64>>>,
}

/// Stage outputs of one run, still index-addressed.
struct Evaluation {
    degrees: Vec<Vec<f64>>,
    strengths: Vec<f64>,
    sets: Vec<Option<OutputSet>>,
    inference: Inference,
    metrics: InferenceMetrics,
}

impl Engine {
    /// Validate and compile `variables` and `rules`.
    ///
    /// Fails on duplicate variable names, variables without terms, an empty
    /// rule set, any rule reference that does not resolve, or an output term
    /// that is zero at every universe point.
    pub fn new(variables: Vec<LinguisticVariable>, rules: Vec<Rule>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for v in &variables {
            if !seen.insert(v.name()) {
                return Err(ConfigError::DuplicateVariable(v.name().to_string()));
            }
            if v.term_count() == 0 {
                return Err(ConfigError::MissingTerms { variable: v.name().to_string() });
            }
        }

        let compiled = CompiledRules::new(&variables, &rules)?;

        let curves: Vec<Vec<Vec<f64>>> = variables
            .iter()
            .map(|v| match v.role() {
                Role::Consequent => v.terms().map(|(_, t)| t.sample(v.universe())).collect(),
                Role::Antecedent => Vec::new(),
            })
            .collect();

        // A fired rule must be able to contribute to the centroid.
        for (v, terms) in variables.iter().zip(&curves) {
            for ((term, _), curve) in v.terms().zip(terms) {
                if curve.iter().all(|&mu| mu == 0.0) {
                    return Err(ConfigError::EmptyTermCurve {
                        variable: v.name().to_string(),
                        term: term.to_string(),
                    });
                }
            }
        }

        tracing::debug!(variables = variables.len(), rules = rules.len(), "fuzzy engine compiled");

        Ok(Engine { variables, rules, compiled, curves })
    }

    pub fn variables(&self) -> &[LinguisticVariable] {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<&LinguisticVariable> {
        self.variables.iter().find(|v| v.name() == name)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Run one inference.
    ///
    /// Every antecedent variable needs a finite value; values outside the
    /// universe are accepted and flagged with
    /// [`InferenceFlags::INPUT_OUTSIDE_UNIVERSE`].
    pub fn compute(&self, inputs: &Inputs) -> Result<Inference, InferenceError> {
        self.evaluate(inputs).map(|e| e.inference)
    }

    /// Like [`Engine::compute`], but keeps every intermediate stage.
    pub fn compute_verbose(&self, inputs: &Inputs) -> Result<InferenceTrace, InferenceError> {
        let eval = self.evaluate(inputs)?;

        let fuzzified = self
            .antecedents()
            .map(|(idx, v)| {
                let terms = v.terms().map(|(name, _)| name.to_string()).zip(eval.degrees[idx].iter().copied());
                (v.name().to_string(), terms.collect())
            })
            .collect();

        let firings = self
            .rules
            .iter()
            .zip(&eval.strengths)
            .map(|(rule, &strength)| RuleFiring {
                rule: rule.name.clone(),
                strength,
                consequent: format!("{}.{}", rule.then.variable, rule.then.term),
            })
            .collect();

        let output_sets = self
            .variables
            .iter()
            .zip(eval.sets)
            .filter_map(|(v, set)| {
                let set = set?;
                let per_term = set
                    .per_term
                    .into_iter()
                    .enumerate()
                    .map(|(term, degrees)| (v.term_name(term).to_string(), degrees))
                    .collect();
                let trace =
                    OutputSetTrace { points: v.universe().points().to_vec(), per_term, aggregated: set.aggregated };
                Some((v.name().to_string(), trace))
            })
            .collect();

        Ok(InferenceTrace { inference: eval.inference, fuzzified, firings, output_sets, metrics: eval.metrics })
    }

    fn antecedents(&self) -> impl Iterator<Item = (usize, &LinguisticVariable)> {
        self.variables.iter().enumerate().filter(|(_, v)| v.role() == Role::Antecedent)
    }

    fn evaluate(&self, inputs: &Inputs) -> Result<Evaluation, InferenceError> {
        let total_start = Instant::now();
        let mut metrics = InferenceMetrics::default();
        let mut flags = InferenceFlags::empty();

        for (name, _) in inputs.iter() {
            if !self.antecedents().any(|(_, v)| v.name() == name) {
                return Err(InferenceError::UnknownInput(name.to_string()));
            }
        }

        // (1) fuzzify
        let stage = Instant::now();
        let mut degrees = vec![Vec::new(); self.variables.len()];
        for (idx, v) in self.antecedents() {
            let value = inputs.get(v.name()).ok_or_else(|| InferenceError::MissingInput(v.name().to_string()))?;
            if !value.is_finite() {
                return Err(InferenceError::NonFiniteInput { variable: v.name().to_string(), value });
            }
            if !v.universe().contains(value) {
                flags |= InferenceFlags::INPUT_OUTSIDE_UNIVERSE;
            }
            degrees[idx] = v.degrees(value);
            tracing::trace!(variable = v.name(), value, degrees = ?degrees[idx], "fuzzified");
        }
        metrics.fuzzify = stage.elapsed();

        // (2) fire
        let stage = Instant::now();
        let strengths: Vec<f64> = self.compiled.rules.iter().map(|r| r.antecedent.fire(&degrees)).collect();
        for (rule, (compiled, strength)) in self.rules.iter().zip(self.compiled.rules.iter().zip(&strengths)) {
            tracing::trace!(
                rule = %rule.name,
                strength,
                output = self.variables[compiled.output].name(),
                "rule fired"
            );
        }
        metrics.rules = stage.elapsed();

        // (3) implication + aggregation
        let stage = Instant::now();
        let sets: Vec<Option<OutputSet>> = self
            .variables
            .iter()
            .enumerate()
            .map(|(idx, v)| {
                (v.role() == Role::Consequent).then(|| {
                    let firings = self.compiled.index.by_consequent[idx]
                        .iter()
                        .map(|&id| (self.compiled.rules[id].term, strengths[id]));
                    aggregate(&self.curves[idx], firings, v.universe().len())
                })
            })
            .collect();
        metrics.aggregate = stage.elapsed();

        // (4) defuzzify
        let stage = Instant::now();
        let mut outputs = BTreeMap::new();
        for (idx, (v, set)) in self.variables.iter().zip(&sets).enumerate() {
            let Some(set) = set else { continue };
            let fired = self.compiled.index.by_consequent[idx].iter().any(|&id| strengths[id] > 0.0);
            let crisp = if fired {
                v.defuzzify(&set.aggregated)
            } else {
                CrispOutput { value: v.universe().lo(), undefined: true }
            };
            if crisp.undefined {
                flags |= InferenceFlags::UNDEFINED_OUTPUT;
                tracing::warn!(variable = v.name(), fallback = crisp.value, "no rule fired; output undefined");
            } else {
                tracing::debug!(variable = v.name(), value = crisp.value, "defuzzified");
            }
            outputs.insert(v.name().to_string(), crisp);
        }
        metrics.defuzzify = stage.elapsed();
        metrics.total = total_start.elapsed();

        Ok(Evaluation { degrees, strengths, sets, inference: Inference { outputs, flags }, metrics })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::membership::Triangle;
    use crate::variable::Universe;
    use crate::{Antecedent, Consequent};

    fn tri(a: f64, b: f64, c: f64) -> Triangle {
        Triangle::new(a, b, c).unwrap()
    }

    /// One input, one output, a single rule `x is mid -> y is mid`.
    fn tiny_engine() -> Engine {
        let x = LinguisticVariable::antecedent("x", Universe::new(0.0, 10.0, 1.0).unwrap())
            .unwrap()
            .with_term("mid", tri(2.0, 5.0, 8.0))
            .unwrap();
        let y = LinguisticVariable::consequent("y", Universe::new(0.0, 20.0, 1.0).unwrap())
            .unwrap()
            .with_term("mid", tri(5.0, 10.0, 15.0))
            .unwrap();
        let rules = vec![Rule::new("only", Antecedent::is("x", "mid"), Consequent::new("y", "mid"))];
        Engine::new(vec![x, y], rules).unwrap()
    }

    #[test]
    fn symmetric_clip_keeps_centroid_at_peak() {
        let engine = tiny_engine();
        let out = engine.compute(&Inputs::new().with("x", 3.5)).unwrap();
        let y = out.output("y").unwrap();
        assert!(!y.undefined);
        assert!((y.value - 10.0).abs() < 1e-9);
        assert!(out.flags.is_empty());
    }

    #[test]
    fn no_firing_is_flagged_not_failed() {
        let engine = tiny_engine();
        let out = engine.compute(&Inputs::new().with("x", 9.5)).unwrap();
        let y = out.output("y").unwrap();
        assert!(y.undefined);
        assert_eq!(y.value, 0.0);
        assert!(out.flags.contains(InferenceFlags::UNDEFINED_OUTPUT));
    }

    #[test]
    fn out_of_universe_input_is_legal() {
        let engine = tiny_engine();
        let out = engine.compute(&Inputs::new().with("x", -4.0)).unwrap();
        assert!(out.flags.contains(InferenceFlags::INPUT_OUTSIDE_UNIVERSE | InferenceFlags::UNDEFINED_OUTPUT));
    }

    #[test]
    fn input_errors() {
        let engine = tiny_engine();
        assert_eq!(engine.compute(&Inputs::new()), Err(InferenceError::MissingInput("x".into())));
        assert_eq!(
            engine.compute(&Inputs::new().with("x", 1.0).with("y", 2.0)),
            Err(InferenceError::UnknownInput("y".into()))
        );
        assert!(matches!(
            engine.compute(&Inputs::new().with("x", f64::NAN)),
            Err(InferenceError::NonFiniteInput { .. })
        ));
    }

    #[test]
    fn construction_validates_variables() {
        let u = Universe::new(0.0, 1.0, 0.5).unwrap();
        let a = LinguisticVariable::antecedent("a", u.clone()).unwrap().with_term("t", tri(0.0, 0.5, 1.0)).unwrap();
        let out = LinguisticVariable::consequent("o", u.clone()).unwrap().with_term("t", tri(0.0, 0.5, 1.0)).unwrap();
        let rule = || vec![Rule::new("r", Antecedent::is("a", "t"), Consequent::new("o", "t"))];

        let dup = Engine::new(vec![a.clone(), a.clone(), out.clone()], rule());
        assert!(matches!(dup, Err(ConfigError::DuplicateVariable(name)) if name == "a"));

        let bare = LinguisticVariable::antecedent("b", u).unwrap();
        let missing = Engine::new(vec![a.clone(), bare, out.clone()], rule());
        assert!(matches!(missing, Err(ConfigError::MissingTerms { .. })));

        assert!(matches!(Engine::new(vec![a, out], Vec::new()), Err(ConfigError::EmptyRuleSet)));
    }

    /// `x is t -> y is spike`, with `spike` on `y`'s `[0, 10]` grid.
    fn spike_engine(spike: Triangle) -> Result<Engine, ConfigError> {
        let u = Universe::new(0.0, 10.0, 1.0).unwrap();
        let x = LinguisticVariable::antecedent("x", u.clone()).unwrap().with_term("t", tri(0.0, 5.0, 10.0)).unwrap();
        let y = LinguisticVariable::consequent("y", u).unwrap().with_term("spike", spike).unwrap();
        Engine::new(vec![x, y], vec![Rule::new("r", Antecedent::is("x", "t"), Consequent::new("y", "spike"))])
    }

    #[test]
    fn output_terms_must_touch_the_grid() {
        let between_points = spike_engine(tri(3.2, 3.5, 3.8));
        assert!(matches!(
            between_points,
            Err(ConfigError::EmptyTermCurve { variable, term }) if variable == "y" && term == "spike"
        ));
        assert!(matches!(spike_engine(tri(70.0, 80.0, 90.0)), Err(ConfigError::EmptyTermCurve { .. })));
    }

    #[test]
    fn narrow_output_term_fires() {
        let engine = spike_engine(tri(2.5, 3.0, 3.5)).unwrap();

        let trace = engine.compute_verbose(&Inputs::new().with("x", 5.0)).unwrap();
        assert_eq!(trace.firings[0].strength, 1.0);
        let y = trace.inference.output("y").unwrap();
        assert!(!y.undefined);
        assert_eq!(y.value, 3.0);
        assert!(trace.inference.flags.is_empty());

        let out = engine.compute(&Inputs::new().with("x", 0.0)).unwrap();
        assert!(out.output("y").unwrap().undefined);
        assert!(out.flags.contains(InferenceFlags::UNDEFINED_OUTPUT));
    }

    #[test]
    fn verbose_trace_names_every_stage() {
        let engine = tiny_engine();
        let trace = engine.compute_verbose(&Inputs::new().with("x", 3.5)).unwrap();

        assert_eq!(trace.fuzzified["x"]["mid"], 0.5);
        assert_eq!(trace.firings.len(), 1);
        assert_eq!(trace.firings[0].strength, 0.5);
        assert_eq!(trace.firings[0].consequent, "y.mid");

        let set = &trace.output_sets["y"];
        assert_eq!(set.points.len(), 21);
        assert_eq!(set.aggregated[10], 0.5);
        assert_eq!(set.per_term["mid"], set.aggregated);
        assert_eq!(trace.inference, engine.compute(&Inputs::new().with("x", 3.5)).unwrap());
        assert!(trace.metrics.total >= trace.metrics.rules);
    }
}
