//! Monthly climate records and the JSON dataset loader.
//!
//! Accepted file shapes:
//!
//! ```text
//! {"meses": [ {"Mes": "Janeiro", "Precipitacao": 180.2, "TemperaturaMed": 26.1}, ... ]}
//! [ {"month": 1, "rainfall": 180.2, "avg_temperature": 26.1}, ... ]
//! ```
//!
//! The inference core never sees the file; it receives `&[InferenceRecord]`.

use crate::error::DatasetError;
use chrono::Month;
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// One month of observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceRecord {
    /// Month identifier as it appears in the dataset ("3", "Março", "2019-03", ...).
    #[serde(alias = "Mes", alias = "mes", deserialize_with = "month_id")]
    pub month: String,
    /// Monthly precipitation, in the dataset's unit (mm).
    #[serde(alias = "Precipitacao", alias = "precipitacao", alias = "chuva")]
    pub rainfall: f64,
    #[serde(alias = "TemperaturaMed", alias = "temperaturaMed", alias = "temperatura")]
    pub avg_temperature: f64,
}

impl InferenceRecord {
    pub fn new(month: impl Into<String>, rainfall: f64, avg_temperature: f64) -> Self {
        Self { month: month.into(), rainfall, avg_temperature }
    }

    /// Resolve the month identifier to a calendar month, if it names one.
    pub fn calendar_month(&self) -> Option<Month> {
        let id = self.month.trim();
        let lower = id.to_lowercase();

        let numeric = match regex!(r"^\d{4}-(\d{1,2})$").captures(id) {
            Some(caps) => caps.get(1).map(|m| m.as_str()),
            None => Some(id),
        };
        if let Some(n) = numeric.and_then(|s| s.parse::<u8>().ok()) {
            return Month::try_from(n).ok();
        }

        lower.parse::<Month>().ok().or_else(|| PORTUGUESE_MONTHS.get(lower.as_str()).copied())
    }
}

/// Portuguese month names and abbreviations.
static PORTUGUESE_MONTHS: Lazy<HashMap<&'static str, Month>> = Lazy::new(|| {
    HashMap::from([
        ("janeiro", Month::January),
        ("fevereiro", Month::February),
        ("fev", Month::February),
        ("março", Month::March),
        ("marco", Month::March),
        ("abril", Month::April),
        ("abr", Month::April),
        ("maio", Month::May),
        ("mai", Month::May),
        ("junho", Month::June),
        ("julho", Month::July),
        ("agosto", Month::August),
        ("ago", Month::August),
        ("setembro", Month::September),
        ("set", Month::September),
        ("outubro", Month::October),
        ("out", Month::October),
        ("novembro", Month::November),
        ("dezembro", Month::December),
        ("dez", Month::December),
    ])
});

fn month_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MonthId {
        Number(u64),
        Text(String),
    }

    Ok(match MonthId::deserialize(deserializer)? {
        MonthId::Number(n) => n.to_string(),
        MonthId::Text(s) => s,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DatasetFile {
    Wrapped {
        #[serde(alias = "months", alias = "records")]
        meses: Vec<InferenceRecord>,
    },
    Bare(Vec<InferenceRecord>),
}

/// Parse records from a JSON string.
pub fn parse(json: &str) -> Result<Vec<InferenceRecord>, DatasetError> {
    Ok(match serde_json::from_str(json)? {
        DatasetFile::Wrapped { meses } => meses,
        DatasetFile::Bare(records) => records,
    })
}

/// Read and parse a JSON dataset file.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<InferenceRecord>, DatasetError> {
    let path = path.as_ref();
    let text =
        std::fs::read_to_string(path).map_err(|source| DatasetError::Io { path: path.to_path_buf(), source })?;
    let records = parse(&text)?;
    tracing::debug!(path = %path.display(), records = records.len(), "dataset loaded");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_portuguese_keys() {
        let json = r#"{"meses": [
            {"Mes": "Janeiro", "Precipitacao": 180.5, "TemperaturaMed": 26.1},
            {"Mes": 2, "Precipitacao": 150.0, "TemperaturaMed": 25.4}
        ]}"#;
        let records = parse(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], InferenceRecord::new("Janeiro", 180.5, 26.1));
        assert_eq!(records[1].month, "2");
    }

    #[test]
    fn parses_bare_english_array() {
        let json = r#"[{"month": "2019-03", "rainfall": 12, "avg_temperature": 21.5}]"#;
        let records = parse(json).unwrap();
        assert_eq!(records, vec![InferenceRecord::new("2019-03", 12.0, 21.5)]);
    }

    #[test]
    fn rejects_records_missing_fields() {
        assert!(matches!(parse(r#"[{"month": 1, "rainfall": 3.0}]"#), Err(DatasetError::Json(_))));
    }

    #[test]
    fn resolves_calendar_months() {
        let month = |id: &str| InferenceRecord::new(id, 0.0, 0.0).calendar_month();
        assert_eq!(month("3"), Some(Month::March));
        assert_eq!(month("2019-11"), Some(Month::November));
        assert_eq!(month("Março"), Some(Month::March));
        assert_eq!(month("july"), Some(Month::July));
        assert_eq!(month("Dez"), Some(Month::December));
        assert_eq!(month("13"), None);
        assert_eq!(month("safra"), None);
    }

    #[test]
    fn load_reads_file_and_reports_missing_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"meses": [{{"Mes": "Maio", "Precipitacao": 80, "TemperaturaMed": 19}}]}}"#).unwrap();
        let records = load(file.path()).unwrap();
        assert_eq!(records[0].calendar_month(), Some(Month::May));

        assert!(matches!(load("/nonexistent/precipitacao.json"), Err(DatasetError::Io { .. })));
    }
}
