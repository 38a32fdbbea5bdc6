//! Decision scan: score every record, keep the best.
//!
//! ```text
//! records ──▶ Scorer::score (per record) ──┬─ Ok(score)  ──▶ Best::merge
//!                                           └─ Err(error) ──▶ rejected, scan continues
//! ```
//!
//! The maximum is strict: on a tie the earlier record stays. `Best::merge`
//! encodes that rule (higher score, then lower index) and is associative and
//! commutative, so partial scans over disjoint slices can be reduced in any
//! order and still agree with a sequential scan.

use crate::dataset::InferenceRecord;
use crate::error::{RecordError, ScanError};
use crate::model::Score;
use serde::Serialize;

/// Anything that can turn a record into a growth score.
pub trait Scorer {
    fn score(&self, record: &InferenceRecord) -> Result<Score, RecordError>;
}

/// Best-so-far accumulator: dataset index plus score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Best {
    pub index: usize,
    pub score: f64,
}

impl Best {
    /// Keep the higher score; on equal scores keep the lower index.
    pub fn merge(self, other: Best) -> Best {
        if other.score > self.score || (other.score == self.score && other.index < self.index) { other } else { self }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    pub index: usize,
    pub record: InferenceRecord,
    pub score: Score,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    pub index: usize,
    pub record: InferenceRecord,
    pub error: RecordError,
}

/// Outcome of [`select_best`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport {
    pub best: Best,
    /// Scored records, in dataset order.
    pub scored: Vec<ScoredRecord>,
    /// Records excluded from the search, in dataset order.
    pub rejected: Vec<RejectedRecord>,
}

impl ScanReport {
    pub fn best_record(&self) -> Option<&ScoredRecord> {
        self.scored.binary_search_by_key(&self.best.index, |s| s.index).ok().map(|pos| &self.scored[pos])
    }
}

/// Score `records` in order and select the one with the highest score.
///
/// Records that fail to score (or score to a non-finite value) are reported in
/// [`ScanReport::rejected`] and skipped. Fails with
/// [`ScanError::EmptyDataset`] when `records` is empty and
/// [`ScanError::NoScorableRecords`] when every record was rejected.
pub fn select_best<S: Scorer + ?Sized>(scorer: &S, records: &[InferenceRecord]) -> Result<ScanReport, ScanError> {
    let span = tracing::debug_span!("select_best", records = records.len());
    let _enter = span.enter();

    if records.is_empty() {
        return Err(ScanError::EmptyDataset);
    }

    let mut best: Option<Best> = None;
    let mut scored = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let result = scorer.score(record).and_then(|score| {
            if score.value.is_finite() {
                Ok(score)
            } else {
                Err(RecordError::NonFinite { field: "score", value: score.value })
            }
        });

        match result {
            Ok(score) => {
                tracing::debug!(
                    index,
                    month = %record.month,
                    score = score.value,
                    undefined = score.undefined,
                    "scored"
                );
                let candidate = Best { index, score: score.value };
                best = Some(best.map_or(candidate, |b| b.merge(candidate)));
                scored.push(ScoredRecord { index, record: record.clone(), score });
            }
            Err(error) => {
                tracing::warn!(index, month = %record.month, %error, "record rejected");
                rejected.push(RejectedRecord { index, record: record.clone(), error });
            }
        }
    }

    let best = best.ok_or(ScanError::NoScorableRecords { rejected: rejected.len() })?;
    tracing::info!(index = best.index, month = %records[best.index].month, score = best.score, "best month selected");

    Ok(ScanReport { best, scored, rejected })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scores a record by its rainfall, so tests can dictate scores directly.
    struct RainfallIsScore;

    impl Scorer for RainfallIsScore {
        fn score(&self, record: &InferenceRecord) -> Result<Score, RecordError> {
            if record.avg_temperature.is_nan() {
                return Err(RecordError::NonFinite { field: "avg_temperature", value: record.avg_temperature });
            }
            Ok(Score { value: record.rainfall, undefined: false })
        }
    }

    fn records(scores: &[f64]) -> Vec<InferenceRecord> {
        scores.iter().enumerate().map(|(i, &s)| InferenceRecord::new((i + 1).to_string(), s, 20.0)).collect()
    }

    #[test]
    fn ties_keep_the_first_record() {
        let report = select_best(&RainfallIsScore, &records(&[10.0, 25.0, 25.0])).unwrap();
        assert_eq!(report.best, Best { index: 1, score: 25.0 });
        assert_eq!(report.best_record().unwrap().record.month, "2");
        assert_eq!(report.scored.len(), 3);
        assert!(report.rejected.is_empty());
    }

    #[test]
    fn empty_dataset_is_an_error() {
        assert_eq!(select_best(&RainfallIsScore, &[]), Err(ScanError::EmptyDataset));
    }

    #[test]
    fn failing_records_are_skipped_not_fatal() {
        let mut data = records(&[5.0, 40.0, 30.0]);
        data[1].avg_temperature = f64::NAN;
        data[2].rainfall = f64::INFINITY;

        let report = select_best(&RainfallIsScore, &data).unwrap();
        assert_eq!(report.best.index, 0);
        assert_eq!(report.rejected.iter().map(|r| r.index).collect::<Vec<_>>(), vec![1, 2]);
        assert!(matches!(report.rejected[1].error, RecordError::NonFinite { field: "score", .. }));
    }

    #[test]
    fn all_rejected_is_an_error() {
        let mut data = records(&[1.0, 2.0]);
        for r in &mut data {
            r.avg_temperature = f64::NAN;
        }
        assert_eq!(select_best(&RainfallIsScore, &data), Err(ScanError::NoScorableRecords { rejected: 2 }));
    }

    #[test]
    fn merge_is_order_independent() {
        let a = Best { index: 0, score: 3.0 };
        let b = Best { index: 1, score: 7.0 };
        let c = Best { index: 2, score: 7.0 };
        assert_eq!(a.merge(b).merge(c), a.merge(b.merge(c)));
        assert_eq!(b.merge(c), c.merge(b));
        assert_eq!(c.merge(a).merge(b), b);
    }
}
