//! Error taxonomy.
//!
//! Three classes of failure exist and they never mix:
//!
//! - [`ConfigError`]: the model itself is wrong (bad breakpoints, a rule that
//!   names an unknown term, ...). Detected once, at construction, and fatal.
//! - [`InferenceError`] / [`RecordError`]: a single evaluation could not run.
//!   A scan reports these per record and keeps going.
//! - [`ScanError`]: the scan as a whole has no answer.
//!
//! An inference where no rule fires is *not* an error; see
//! [`crate::CrispOutput::undefined`].

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors, raised while building variables, rules or an engine.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed triangle ({a}, {b}, {c}): breakpoints must be finite and satisfy a <= b <= c")]
    MalformedTriangle { a: f64, b: f64, c: f64 },

    #[error("invalid universe [{lo}, {hi}] with step {step}: bounds must be finite, lo < hi, step > 0")]
    InvalidUniverse { lo: f64, hi: f64, step: f64 },

    #[error("invalid name '{name}': expected a letter or '_' followed by letters, digits or '_'")]
    InvalidName { name: String },

    #[error("variable '{0}' declared more than once")]
    DuplicateVariable(String),

    #[error("term '{term}' declared more than once on variable '{variable}'")]
    DuplicateTerm { variable: String, term: String },

    #[error("variable '{variable}' has no terms")]
    MissingTerms { variable: String },

    #[error("term '{term}' of output variable '{variable}' has no membership on its universe grid")]
    EmptyTermCurve { variable: String, term: String },

    #[error("rule set is empty")]
    EmptyRuleSet,

    #[error("rule '{rule}' references undeclared variable '{variable}'")]
    UnknownVariable { rule: String, variable: String },

    #[error("rule '{rule}' references undeclared term '{term}' on variable '{variable}'")]
    UnknownTerm { rule: String, variable: String, term: String },

    #[error("rule '{rule}' uses consequent variable '{variable}' in its antecedent")]
    NotAnAntecedent { rule: String, variable: String },

    #[error("rule '{rule}' concludes on antecedent variable '{variable}'")]
    NotAConsequent { rule: String, variable: String },

    #[error("rainfall scale factor must be finite and positive, got {0}")]
    InvalidScaleFactor(f64),

    #[error("failed to read configuration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by [`crate::Engine::compute`] for one set of inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("no value supplied for input variable '{0}'")]
    MissingInput(String),

    #[error("'{0}' is not an input variable of this engine")]
    UnknownInput(String),

    #[error("input '{variable}' is not finite ({value})")]
    NonFiniteInput { variable: String, value: f64 },
}

/// Why a single dataset record could not be scored.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("field '{field}' is not finite ({value})")]
    NonFinite { field: &'static str, value: f64 },

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// Failures of a whole decision scan.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanError {
    #[error("dataset is empty: no month to select")]
    EmptyDataset,

    #[error("none of the {rejected} record(s) could be scored")]
    NoScorableRecords { rejected: usize },
}

/// Dataset loading failures.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
}
