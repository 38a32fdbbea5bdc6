//! Growth model: maps climate records onto engine inputs.

use crate::config::VariableNames;
use crate::dataset::InferenceRecord;
use crate::engine::{Engine, Inference, InferenceTrace, Inputs};
use crate::error::{ConfigError, InferenceError, RecordError};
use crate::scan::Scorer;
use crate::variable::Role;
use serde::Serialize;

/// Multiplier applied to raw monthly rainfall before inference.
///
/// Empirical constant from the soybean growth study; it maps
/// 284 mm of monthly rainfall onto the top of the `[0, 50]` rainfall universe.
pub const DEFAULT_RAINFALL_SCALE_FACTOR: f64 = 0.17605633802;

/// Pseudo rule name used in errors about the record-to-variable binding.
const MODEL_BINDING: &str = "<growth model>";

/// Crisp growth estimate for one record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Score {
    pub value: f64,
    /// No rule fired; `value` is the growth universe's lower bound.
    pub undefined: bool,
}

/// A compiled engine plus the glue that feeds it records.
#[derive(Debug)]
pub struct GrowthModel {
    engine: Engine,
    names: VariableNames,
    rainfall_scale_factor: f64,
    growth_floor: f64,
}

impl GrowthModel {
    /// Wrap `engine`, checking that the named variables exist with the right roles.
    pub fn new(engine: Engine, names: VariableNames, rainfall_scale_factor: f64) -> Result<Self, ConfigError> {
        if !rainfall_scale_factor.is_finite() || rainfall_scale_factor <= 0.0 {
            return Err(ConfigError::InvalidScaleFactor(rainfall_scale_factor));
        }
        let role_of = |name: &str| {
            engine.variable(name).map(|v| v.role()).ok_or_else(|| ConfigError::UnknownVariable {
                rule: MODEL_BINDING.to_string(),
                variable: name.to_string(),
            })
        };
        for name in [&names.rainfall, &names.temperature] {
            if role_of(name.as_str())? != Role::Antecedent {
                return Err(ConfigError::NotAnAntecedent { rule: MODEL_BINDING.to_string(), variable: name.clone() });
            }
        }
        if role_of(names.growth.as_str())? != Role::Consequent {
            return Err(ConfigError::NotAConsequent { rule: MODEL_BINDING.to_string(), variable: names.growth.clone() });
        }
        let growth_floor = engine.variable(&names.growth).map_or(0.0, |v| v.universe().lo());
        Ok(Self { engine, names, rainfall_scale_factor, growth_floor })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn names(&self) -> &VariableNames {
        &self.names
    }

    pub fn rainfall_scale_factor(&self) -> f64 {
        self.rainfall_scale_factor
    }

    fn inputs(&self, rainfall: f64, temperature: f64) -> Inputs {
        Inputs::new().with(self.names.rainfall.as_str(), rainfall).with(self.names.temperature.as_str(), temperature)
    }

    /// Evaluate a scenario whose rainfall is already in universe units.
    pub fn evaluate(&self, rainfall: f64, temperature: f64) -> Result<Inference, InferenceError> {
        self.engine.compute(&self.inputs(rainfall, temperature))
    }

    pub fn evaluate_verbose(&self, rainfall: f64, temperature: f64) -> Result<InferenceTrace, InferenceError> {
        self.engine.compute_verbose(&self.inputs(rainfall, temperature))
    }

    /// Rainfall as fed to the engine for `record`.
    pub fn scaled_rainfall(&self, record: &InferenceRecord) -> f64 {
        record.rainfall * self.rainfall_scale_factor
    }

    fn growth_of(&self, inference: &Inference) -> Score {
        // `new` checked that growth is a consequent, and every consequent gets an output.
        match inference.output(&self.names.growth) {
            Some(out) => Score { value: out.value, undefined: out.undefined },
            None => Score { value: self.growth_floor, undefined: true },
        }
    }
}

impl Scorer for GrowthModel {
    fn score(&self, record: &InferenceRecord) -> Result<Score, RecordError> {
        if !record.rainfall.is_finite() {
            return Err(RecordError::NonFinite { field: "rainfall", value: record.rainfall });
        }
        if !record.avg_temperature.is_finite() {
            return Err(RecordError::NonFinite { field: "avg_temperature", value: record.avg_temperature });
        }
        let inference = self.evaluate(self.scaled_rainfall(record), record.avg_temperature)?;
        Ok(self.growth_of(&inference))
    }
}
