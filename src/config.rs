//! Model configuration.
//!
//! Everything that defines a growth model lives in [`ModelConfig`]: the three
//! universes, every term's breakpoints, the rule list and the rainfall scale
//! factor. It is plain data (serde), validated once by [`ModelConfig::build`]
//! and immutable afterwards.
//!
//! ```json
//! {
//!   "rainfall_universe":    [0, 50, 1],
//!   "temperature_universe": [0, 50, 1],
//!   "growth_universe":      [0, 60, 1],
//!   "terms": {
//!     "chuva":       {"baixa": [0, 0, 25], "regular": [0, 25, 50], "chuvoso": [25, 50, 50]},
//!     "temperatura": {"baixa": [0, 0, 25], "media":   [0, 25, 50], "alta":    [25, 50, 50]},
//!     "crescimento": {"baixo": [0, 0, 30], "medio":   [0, 30, 60], "alto":    [30, 60, 60]}
//!   },
//!   "rules": [
//!     {"name": "dry_and_mild", "when": {"and": [{"is": {"variable": "chuva", "term": "baixa"}},
//!                                               {"is": {"variable": "temperatura", "term": "media"}}]},
//!      "then": {"variable": "crescimento", "term": "medio"}}
//!   ],
//!   "rainfall_scale_factor": 0.17605633802
//! }
//! ```

use crate::Rule;
use crate::engine::Engine;
use crate::error::ConfigError;
use crate::membership::Triangle;
use crate::model::{DEFAULT_RAINFALL_SCALE_FACTOR, GrowthModel};
use crate::variable::{LinguisticVariable, Universe};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Names of the three linguistic variables of a growth model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableNames {
    pub rainfall: String,
    pub temperature: String,
    pub growth: String,
}

impl Default for VariableNames {
    fn default() -> Self {
        Self {
            rainfall: "chuva".to_string(),
            temperature: "temperatura".to_string(),
            growth: "crescimento".to_string(),
        }
    }
}

fn default_scale_factor() -> f64 {
    DEFAULT_RAINFALL_SCALE_FACTOR
}

/// Complete, serializable description of a growth model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    #[serde(default)]
    pub variables: VariableNames,
    pub rainfall_universe: Universe,
    pub temperature_universe: Universe,
    pub growth_universe: Universe,
    /// Variable name -> term name -> `[a, b, c]`.
    pub terms: BTreeMap<String, BTreeMap<String, Triangle>>,
    pub rules: Vec<Rule>,
    #[serde(default = "default_scale_factor")]
    pub rainfall_scale_factor: f64,
}

impl Default for ModelConfig {
    /// The soybean model: rainfall and temperature over `[0, 50]`, growth over
    /// `[0, 60]`, four rules.
    fn default() -> Self {
        crate::rules::growth::soybean()
    }
}

impl ModelConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_json(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration and compile it into a [`GrowthModel`].
    pub fn build(&self) -> Result<GrowthModel, ConfigError> {
        let names = &self.variables;
        for declared in self.terms.keys() {
            if ![&names.rainfall, &names.temperature, &names.growth].contains(&declared) {
                return Err(ConfigError::UnknownVariable { rule: "<terms>".to_string(), variable: declared.clone() });
            }
        }

        let variables = vec![
            self.variable(LinguisticVariable::antecedent(names.rainfall.as_str(), self.rainfall_universe.clone())?)?,
            self.variable(LinguisticVariable::antecedent(
                names.temperature.as_str(),
                self.temperature_universe.clone(),
            )?)?,
            self.variable(LinguisticVariable::consequent(names.growth.as_str(), self.growth_universe.clone())?)?,
        ];

        let engine = Engine::new(variables, self.rules.clone())?;
        GrowthModel::new(engine, names.clone(), self.rainfall_scale_factor)
    }

    fn variable(&self, mut variable: LinguisticVariable) -> Result<LinguisticVariable, ConfigError> {
        let terms = self
            .terms
            .get(variable.name())
            .ok_or_else(|| ConfigError::MissingTerms { variable: variable.name().to_string() })?;
        for (name, triangle) in terms {
            variable = variable.with_term(name.as_str(), *triangle)?;
        }
        Ok(variable)
    }
}
