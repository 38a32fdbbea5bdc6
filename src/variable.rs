//! Universes and linguistic variables.
//!
//! A [`LinguisticVariable`] couples a discretized numeric [`Universe`] with a
//! set of named [`Triangle`] terms. Antecedents are fuzzified, consequents are
//! defuzzified; the universe grid is both the sampling grid for consequent
//! curves and the integration grid for the centroid.

use crate::error::ConfigError;
use crate::membership::Triangle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Upper bound on grid size; anything larger is almost certainly a typo in `step`.
const MAX_UNIVERSE_POINTS: usize = 1_000_000;

/// Ordered, immutable discretization of `[lo, hi]` with a fixed step.
///
/// Points are computed as `lo + i * step` (never by accumulation) so the grid
/// does not drift. The last point is the largest one not exceeding `hi`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 3]", into = "[f64; 3]")]
pub struct Universe {
    lo: f64,
    hi: f64,
    step: f64,
    points: Vec<f64>,
}

impl Universe {
    pub fn new(lo: f64, hi: f64, step: f64) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidUniverse { lo, hi, step };
        if !(lo.is_finite() && hi.is_finite() && step.is_finite()) || lo >= hi || step <= 0.0 {
            return Err(invalid());
        }
        // Tolerate (hi - lo) / step landing a hair under an integer.
        let intervals = ((hi - lo) / step + 1e-9).floor();
        if intervals >= MAX_UNIVERSE_POINTS as f64 {
            return Err(invalid());
        }
        let points = (0..=intervals as usize).map(|i| lo + i as f64 * step).collect();
        Ok(Self { lo, hi, step, points })
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.lo && x <= self.hi
    }
}

impl TryFrom<[f64; 3]> for Universe {
    type Error = ConfigError;

    fn try_from([lo, hi, step]: [f64; 3]) -> Result<Self, Self::Error> {
        Universe::new(lo, hi, step)
    }
}

impl From<Universe> for [f64; 3] {
    fn from(u: Universe) -> Self {
        [u.lo, u.hi, u.step]
    }
}

/// Whether a variable is read from inputs or produced by inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Antecedent,
    Consequent,
}

/// Crisp result of defuzzifying one output variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CrispOutput {
    pub value: f64,
    /// True when no rule concluding on this output fired. `value` is then the
    /// universe's lower bound rather than a centroid.
    pub undefined: bool,
}

/// A named universe with triangular terms.
#[derive(Debug, Clone)]
pub struct LinguisticVariable {
    name: String,
    role: Role,
    universe: Universe,
    // Insertion order is the term index used by compiled rules.
    terms: Vec<(String, Triangle)>,
}

impl LinguisticVariable {
    pub fn antecedent(name: impl Into<String>, universe: Universe) -> Result<Self, ConfigError> {
        Self::new(name.into(), Role::Antecedent, universe)
    }

    pub fn consequent(name: impl Into<String>, universe: Universe) -> Result<Self, ConfigError> {
        Self::new(name.into(), Role::Consequent, universe)
    }

    fn new(name: String, role: Role, universe: Universe) -> Result<Self, ConfigError> {
        validate_name(&name)?;
        Ok(Self { name, role, universe, terms: Vec::new() })
    }

    /// Add a term; names must be unique within the variable.
    pub fn with_term(mut self, name: impl Into<String>, triangle: Triangle) -> Result<Self, ConfigError> {
        let name = name.into();
        validate_name(&name)?;
        if self.term_index(&name).is_some() {
            return Err(ConfigError::DuplicateTerm { variable: self.name, term: name });
        }
        self.terms.push((name, triangle));
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn terms(&self) -> impl Iterator<Item = (&str, &Triangle)> {
        self.terms.iter().map(|(n, t)| (n.as_str(), t))
    }

    pub fn term(&self, name: &str) -> Option<&Triangle> {
        self.terms.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    pub(crate) fn term_index(&self, name: &str) -> Option<usize> {
        self.terms.iter().position(|(n, _)| n == name)
    }

    pub(crate) fn term_name(&self, index: usize) -> &str {
        &self.terms[index].0
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Degree of `x` in every term, keyed by term name.
    ///
    /// `x` may lie outside the universe; terms whose support excludes it
    /// simply report 0.
    pub fn fuzzify(&self, x: f64) -> BTreeMap<String, f64> {
        self.terms.iter().map(|(name, t)| (name.clone(), t.degree(x))).collect()
    }

    /// Degrees in term-index order.
    pub(crate) fn degrees(&self, x: f64) -> Vec<f64> {
        self.terms.iter().map(|(_, t)| t.degree(x)).collect()
    }

    /// Centroid of `aggregated`, one degree per universe point.
    ///
    /// An all-zero set has no centroid; the lower bound is reported with
    /// `undefined` set.
    pub fn defuzzify(&self, aggregated: &[f64]) -> CrispOutput {
        debug_assert_eq!(aggregated.len(), self.universe.len());
        let (weighted, total) = self
            .universe
            .points()
            .iter()
            .zip(aggregated)
            .fold((0.0, 0.0), |(num, den), (&x, &mu)| (num + x * mu, den + mu));

        if total > 0.0 {
            CrispOutput { value: weighted / total, undefined: false }
        } else {
            CrispOutput { value: self.universe.lo(), undefined: true }
        }
    }
}

pub(crate) fn validate_name(name: &str) -> Result<(), ConfigError> {
    if regex!(r"^[\p{L}_][\p{L}\p{N}_]*$").is_match(name) {
        Ok(())
    } else {
        Err(ConfigError::InvalidName { name: name.to_string() })
    }
}
