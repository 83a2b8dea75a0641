use super::SeriesFilter;
use crate::extraction::AngleSample;

/// Removes direction changes that happen faster than a given period.
///
/// A sample is dropped when the series turns around at it (rising into it
/// and not rising out of it, or the reverse) and its two neighbours are at
/// most `max_period` seconds apart. The first and last samples are always
/// kept. Each decision looks at the original neighbours, not at what was
/// kept before.
pub struct TremblingFilter {
    max_period: f64,
}

impl TremblingFilter {
    /// Create a filter from the longest period still considered trembling
    ///
    /// # Panics
    ///
    /// Panics if `max_period` is not positive
    #[must_use]
    pub fn new(max_period: f64) -> Self {
        assert!(max_period > 0.0, "Max trembling period must be positive, got {max_period}");
        Self { max_period }
    }

    /// Create a filter from the lowest frequency considered trembling.
    /// Returns `None` for a frequency of zero, which disables the filter.
    #[must_use]
    pub fn from_frequency(min_frequency: f64) -> Option<Self> {
        (min_frequency.is_finite() && min_frequency > 0.0).then(|| Self::new(1.0 / min_frequency))
    }

    /// Longest neighbour spacing treated as trembling, in seconds
    #[must_use]
    pub fn max_period(&self) -> f64 {
        self.max_period
    }

    fn is_trembling(&self, previous: &AngleSample, current: &AngleSample, next: &AngleSample) -> bool {
        let short_period = next.time - previous.time <= self.max_period;
        let turns_around = (current.angle - previous.angle > 0.0) != (next.angle - current.angle > 0.0);
        short_period && turns_around
    }
}

impl SeriesFilter for TremblingFilter {
    fn apply(&self, samples: &[AngleSample]) -> Vec<AngleSample> {
        let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
            return Vec::new();
        };
        if samples.len() <= 2 {
            return samples.to_vec();
        }

        let mut filtered = Vec::with_capacity(samples.len());
        filtered.push(*first);
        filtered.extend(
            samples
                .windows(3)
                .filter(|w| !self.is_trembling(&w[0], &w[1], &w[2]))
                .map(|w| w[1]),
        );
        filtered.push(*last);
        filtered
    }

    fn name(&self) -> &str {
        "TremblingFilter"
    }
}
