//! stats
#![deny(missing_docs)]

mod histogram;
mod nx;
pub use histogram::{histogram, HistogramBin, DEFAULT_NUM_BINS};
pub use nx::n50;

use num_traits::PrimInt;

/// Compute the arithmetic mean of a list of integers.
/// Returns `None` for an empty list instead of dividing by zero.
pub fn mean<T: PrimInt>(items: &[T]) -> Option<f64> {
    if items.is_empty() {
        return None;
    }
    let sum: f64 = items.iter().map(|x| x.to_f64().unwrap_or(0.0)).sum();
    Some(sum / items.len() as f64)
}

/// Summary of a set of contig lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct LengthSummary {
    /// Number of contigs.
    pub count: usize,
    /// Mean length in bases, `None` when there are no contigs.
    pub mean_length: Option<f64>,
    /// N50 in bases, `None` when there are no contigs.
    pub n50: Option<usize>,
    /// Length distribution, empty when there are no contigs.
    pub histogram: Vec<HistogramBin>,
}

/// Count, mean, N50 and a [`DEFAULT_NUM_BINS`]-bin histogram of `lengths`.
pub fn summarize(lengths: &[usize]) -> LengthSummary {
    LengthSummary {
        count: lengths.len(),
        mean_length: mean(lengths),
        n50: n50(lengths),
        histogram: histogram(lengths, DEFAULT_NUM_BINS),
    }
}
