//! Implication and aggregation.
//!
//! ```text
//! strength s, consequent curve μ(x)  ──min──▶  clipped(x) = min(s, μ(x))
//! clipped sets of one term           ──max──▶  term set
//! term sets of one output            ──max──▶  aggregated set
//! ```
//!
//! All sets live on the consequent variable's universe grid.

/// Aggregated fuzzy set of one output variable for one inference.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct OutputSet {
    /// One set per consequent term (term-index order).
    pub per_term: Vec<Vec<f64>>,
    /// Pointwise max across `per_term`.
    pub aggregated: Vec<f64>,
}

/// Min-clip `curve` at `strength`, folding the result into `acc` by max.
pub(crate) fn implicate_into(acc: &mut [f64], strength: f64, curve: &[f64]) {
    for (slot, &mu) in acc.iter_mut().zip(curve) {
        *slot = slot.max(strength.min(mu));
    }
}

/// Build the output set from term curves and `(term, strength)` firings.
pub(crate) fn aggregate(curves: &[Vec<f64>], firings: impl IntoIterator<Item = (usize, f64)>, len: usize) -> OutputSet {
    let mut per_term = vec![vec![0.0_f64; len]; curves.len()];
    for (term, strength) in firings {
        implicate_into(&mut per_term[term], strength, &curves[term]);
    }

    let mut aggregated = vec![0.0_f64; len];
    for set in &per_term {
        for (slot, &mu) in aggregated.iter_mut().zip(set) {
            *slot = slot.max(mu);
        }
    }

    OutputSet { per_term, aggregated }
}
