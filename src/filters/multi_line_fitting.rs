//! Multi-Line Fitting: error-bounded simplification of a value-over-time curve.
//!
//! Starting from the straight line between the first and last sample, the
//! sample furthest from the current piecewise-linear approximation is
//! promoted to a kept vertex until every remaining sample lies within the
//! error threshold. The threshold is a fraction of the series' value range.
//!
//! Each unresolved interval between two kept vertices contributes its worst
//! sample to a max-heap. Promoting a sample only splits its own interval, so
//! only the two new halves are rescanned.

use super::SeriesFilter;
use crate::extraction::AngleSample;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Worst sample of an interval `(left, right)` between two kept vertices
#[derive(Debug, Clone, Copy)]
struct Candidate {
    error: f64,
    index: usize,
    left: usize,
    right: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    // Largest error first; equal errors pop the earliest sample first
    fn cmp(&self, other: &Self) -> Ordering {
        self.error
            .total_cmp(&other.error)
            .then_with(|| other.index.cmp(&self.index))
    }
}

/// Multi-Line Fitting simplifier
pub struct MultiLineFitting {
    max_error_ratio: f64,
}

impl MultiLineFitting {
    /// Create a simplifier
    ///
    /// # Panics
    ///
    /// Panics if `max_error_ratio` is not in (0, 1]
    #[must_use]
    pub fn new(max_error_ratio: f64) -> Self {
        assert!(
            max_error_ratio > 0.0 && max_error_ratio <= 1.0,
            "Max error ratio must be in (0, 1], got {max_error_ratio}"
        );
        Self { max_error_ratio }
    }

    /// Absolute error allowed for a series
    #[must_use]
    pub fn threshold(&self, samples: &[AngleSample]) -> f64 {
        let (min, max) = samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), s| {
                (min.min(s.angle), max.max(s.angle))
            });
        if samples.is_empty() {
            0.0
        } else {
            (max - min) * self.max_error_ratio
        }
    }

    /// Indices of the samples kept by the fit, ascending
    #[must_use]
    pub fn kept_indices(&self, samples: &[AngleSample]) -> Vec<usize> {
        let n = samples.len();
        if n <= 2 {
            return (0..n).collect();
        }

        let threshold = self.threshold(samples);
        let mut kept = vec![false; n];
        kept[0] = true;
        kept[n - 1] = true;

        let mut heap = BinaryHeap::new();
        heap.extend(worst_in(samples, 0, n - 1, threshold));

        while let Some(candidate) = heap.pop() {
            kept[candidate.index] = true;
            heap.extend(worst_in(samples, candidate.left, candidate.index, threshold));
            heap.extend(worst_in(samples, candidate.index, candidate.right, threshold));
        }

        kept.iter()
            .enumerate()
            .filter_map(|(index, &keep)| keep.then_some(index))
            .collect()
    }
}

/// Sample strictly between `left` and `right` furthest from their chord,
/// if that distance exceeds the threshold
fn worst_in(samples: &[AngleSample], left: usize, right: usize, threshold: f64) -> Option<Candidate> {
    let start = samples[left];
    let end = samples[right];
    let slope = (end.angle - start.angle) / (end.time - start.time);

    let mut worst: Option<Candidate> = None;
    for (index, sample) in samples.iter().enumerate().take(right).skip(left + 1) {
        let estimate = start.angle + (sample.time - start.time) * slope;
        let error = (sample.angle - estimate).abs();
        if error > threshold && worst.map_or(true, |w| error > w.error) {
            worst = Some(Candidate {
                error,
                index,
                left,
                right,
            });
        }
    }
    worst
}

impl SeriesFilter for MultiLineFitting {
    fn apply(&self, samples: &[AngleSample]) -> Vec<AngleSample> {
        self.kept_indices(samples)
            .into_iter()
            .map(|index| samples[index])
            .collect()
    }

    fn name(&self) -> &str {
        "MultiLineFitting"
    }
}
