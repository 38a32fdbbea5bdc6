use crate::config::ModelConfig;
use crate::dataset::InferenceRecord;
use crate::engine::{Inference, InferenceTrace};
use crate::error::{InferenceError, ScanError};
use crate::model::GrowthModel;
use crate::scan::{ScanReport, select_best};
use once_cell::sync::Lazy;

static DEFAULT_MODEL: Lazy<GrowthModel> =
    Lazy::new(|| ModelConfig::default().build().expect("built-in soybean model is valid"));

/// The built-in soybean model, compiled on first use.
pub fn default_model() -> &'static GrowthModel {
    &DEFAULT_MODEL
}

/// Evaluate one scenario with the default model.
///
/// `rainfall` is in rainfall-universe units (already scaled).
///
/// # Example
/// ```
/// let out = agrofuzzy::evaluate(25.0, 25.0).unwrap();
/// let growth = out.output("crescimento").unwrap();
/// assert!(growth.value > 45.0);
/// ```
pub fn evaluate(rainfall: f64, temperature: f64) -> Result<Inference, InferenceError> {
    DEFAULT_MODEL.evaluate(rainfall, temperature)
}

/// Like [`evaluate`], but returns the full inference trace.
pub fn evaluate_verbose(rainfall: f64, temperature: f64) -> Result<InferenceTrace, InferenceError> {
    DEFAULT_MODEL.evaluate_verbose(rainfall, temperature)
}

/// Run the decision scan over raw monthly records with the default model.
///
/// Rainfall is scaled by the model's rainfall scale factor before inference.
pub fn select_best_month(records: &[InferenceRecord]) -> Result<ScanReport, ScanError> {
    select_best(&*DEFAULT_MODEL, records)
}
