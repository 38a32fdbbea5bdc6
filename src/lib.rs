extern crate self as agrofuzzy;

use serde::{Deserialize, Serialize};
use std::ops::{BitAnd, BitOr};

#[macro_use]
mod macros;
mod api;
mod config;
mod dataset;
mod engine;
mod error;
mod membership;
mod model;
mod rules;
mod scan;
mod variable;

pub use api::{default_model, evaluate, evaluate_verbose, select_best_month};
pub use config::{ModelConfig, VariableNames};
pub use dataset::{InferenceRecord, load as load_dataset};
pub use engine::{
    Engine, Inference, InferenceFlags, InferenceMetrics, InferenceTrace, Inputs, OutputSetTrace, RuleFiring,
};
pub use error::{ConfigError, DatasetError, InferenceError, RecordError, ScanError};
pub use membership::Triangle;
pub use model::{DEFAULT_RAINFALL_SCALE_FACTOR, GrowthModel, Score};
pub use scan::{Best, RejectedRecord, ScanReport, ScoredRecord, Scorer, select_best};
pub use variable::{CrispOutput, LinguisticVariable, Role, Universe};

// --- Rule types -------------------------------------------------------------

/// Antecedent expression: a tree of `(variable, term)` leaves joined by fuzzy
/// AND (min) and OR (max).
///
/// Serialized externally tagged:
///
/// ```text
/// {"is":  {"variable": "chuva", "term": "baixa"}}
/// {"and": [<antecedent>, <antecedent>]}
/// {"or":  [<antecedent>, <antecedent>]}
/// ```
///
/// Trees are usually built with [`Antecedent::is`] and the `&` / `|`
/// operators, or the `is!` macro.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Antecedent {
    Is { variable: String, term: String },
    And(Box<Antecedent>, Box<Antecedent>),
    Or(Box<Antecedent>, Box<Antecedent>),
}

impl Antecedent {
    pub fn is(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Antecedent::Is { variable: variable.into(), term: term.into() }
    }

    pub fn and(self, other: Antecedent) -> Self {
        Antecedent::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Antecedent) -> Self {
        Antecedent::Or(Box::new(self), Box::new(other))
    }

    /// Visit every `(variable, term)` leaf, left to right.
    pub fn leaves(&self) -> Vec<(&str, &str)> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<(&'a str, &'a str)>) {
        match self {
            Antecedent::Is { variable, term } => out.push((variable, term)),
            Antecedent::And(l, r) | Antecedent::Or(l, r) => {
                l.collect_leaves(out);
                r.collect_leaves(out);
            }
        }
    }
}

impl BitAnd for Antecedent {
    type Output = Antecedent;

    fn bitand(self, rhs: Antecedent) -> Antecedent {
        self.and(rhs)
    }
}

impl BitOr for Antecedent {
    type Output = Antecedent;

    fn bitor(self, rhs: Antecedent) -> Antecedent {
        self.or(rhs)
    }
}

impl std::fmt::Display for Antecedent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Antecedent::Is { variable, term } => write!(f, "{variable} is {term}"),
            Antecedent::And(l, r) => write!(f, "({l} and {r})"),
            Antecedent::Or(l, r) => write!(f, "({l} or {r})"),
        }
    }
}

/// Rule conclusion: `variable is term`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consequent {
    pub variable: String,
    pub term: String,
}

impl Consequent {
    pub fn new(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Consequent { variable: variable.into(), term: term.into() }
    }
}

/// A fuzzy rule: `if <when> then <then>`, implied by min-clipping.
///
/// Rules name variables and terms as strings; they are resolved against the
/// engine's variables once, when the [`Engine`] is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub when: Antecedent,
    pub then: Consequent,
}

impl Rule {
    pub fn new(name: impl Into<String>, when: Antecedent, then: Consequent) -> Self {
        Rule { name: name.into(), when, then }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "if {} then {} is {}", self.when, self.then.variable, self.then.term)
    }
}
