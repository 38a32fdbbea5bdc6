//! Soybean growth model.
//!
//! Soybean develops best with moderate heat and regular rain; dry months
//! stunt it. Rainfall and temperature share the same three-term layout over
//! `[0, 50]`; growth uses `[0, 60]`.

mod rules;
mod terms;


use crate::config::{ModelConfig, VariableNames};
use crate::membership::Triangle;
use crate::model::DEFAULT_RAINFALL_SCALE_FACTOR;
use crate::variable::Universe;
use std::collections::BTreeMap;

/// The built-in soybean configuration.
///
/// Panics only if the compiled-in constants are invalid, which the tests in
/// this module rule out.
pub(crate) fn soybean() -> ModelConfig {
    let universe = |[lo, hi, step]: [f64; 3]| Universe::new(lo, hi, step).expect("built-in universe is valid");
    let table = |terms: &[(&str, [f64; 3])]| -> BTreeMap<String, Triangle> {
        terms
            .iter()
            .map(|&(name, [a, b, c])| {
                (name.to_string(), Triangle::new(a, b, c).expect("built-in breakpoints are ordered"))
            })
            .collect()
    };

    let variables = VariableNames::default();
    let terms = BTreeMap::from([
        (variables.rainfall.clone(), table(terms::RAINFALL)),
        (variables.temperature.clone(), table(terms::TEMPERATURE)),
        (variables.growth.clone(), table(terms::GROWTH)),
    ]);

    ModelConfig {
        variables,
        rainfall_universe: universe(terms::RAINFALL_UNIVERSE),
        temperature_universe: universe(terms::TEMPERATURE_UNIVERSE),
        growth_universe: universe(terms::GROWTH_UNIVERSE),
        terms,
        rules: rules::get(),
        rainfall_scale_factor: DEFAULT_RAINFALL_SCALE_FACTOR,
    }
}
