use super::SeriesFilter;
use crate::constants::RESAMPLE_WINDOW_SECONDS;
use crate::extraction::AngleSample;

/// Caps keyframe density by averaging consecutive samples.
///
/// The first and last samples pass through untouched so the clip keeps its
/// exact start and end. The samples between them are grouped into
/// consecutive windows, each closed once it holds `max_keys_per_sec`
/// samples or once the next sample would make it span more than one
/// second. Every window becomes one sample at its mean time and mean angle.
pub struct Resampler {
    max_keys_per_sec: usize,
}

impl Resampler {
    /// Create a resampler
    ///
    /// # Panics
    ///
    /// Panics if `max_keys_per_sec` is zero
    #[must_use]
    pub fn new(max_keys_per_sec: usize) -> Self {
        assert!(max_keys_per_sec > 0, "Keys per second must be greater than 0");
        Self { max_keys_per_sec }
    }

    fn average(window: &[AngleSample]) -> AngleSample {
        #[allow(clippy::cast_precision_loss)] // Window sizes are tiny
        let count = window.len() as f64;
        let (time, angle) = window
            .iter()
            .fold((0.0, 0.0), |(t, a), s| (t + s.time, a + s.angle));
        AngleSample::new(time / count, angle / count)
    }
}

impl SeriesFilter for Resampler {
    fn apply(&self, samples: &[AngleSample]) -> Vec<AngleSample> {
        let [first, interior @ .., last] = samples else {
            return samples.to_vec();
        };

        let mut resampled = Vec::with_capacity(interior.len() / self.max_keys_per_sec + 3);
        resampled.push(*first);

        let mut start = 0;
        while start < interior.len() {
            let window_start = interior[start].time;
            let mut end = start + 1;
            while end < interior.len()
                && end - start < self.max_keys_per_sec
                && interior[end].time - window_start <= RESAMPLE_WINDOW_SECONDS
            {
                end += 1;
            }
            resampled.push(Self::average(&interior[start..end]));
            start = end;
        }

        resampled.push(*last);
        resampled
    }

    fn name(&self) -> &str {
        "Resampler"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn series(fps: f64, values: &[f64]) -> Vec<AngleSample> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| AngleSample::new(i as f64 / fps, v))
            .collect()
    }

    #[test]
    fn test_groups_by_count() {
        let resampler = Resampler::new(2);
        let input = series(10.0, &[0.0, 1.0, 3.0, 5.0, 7.0, 9.0, 10.0]);
        let output = resampler.apply(&input);

        assert_eq!(output.len(), 5);
        assert_eq!(output[0], input[0]);
        assert_relative_eq!(output[1].time, 0.15, epsilon = 1e-12);
        assert_relative_eq!(output[1].angle, 2.0);
        assert_relative_eq!(output[2].time, 0.35, epsilon = 1e-12);
        assert_relative_eq!(output[2].angle, 6.0);
        // Leftover single sample forms its own window
        assert_relative_eq!(output[3].time, 0.5, epsilon = 1e-12);
        assert_relative_eq!(output[3].angle, 9.0);
        assert_eq!(output[4], input[6]);
    }

    #[test]
    fn test_groups_by_elapsed_time() {
        let resampler = Resampler::new(10);
        let input = vec![
            AngleSample::new(0.0, 0.0),
            AngleSample::new(0.5, 2.0),
            AngleSample::new(1.0, 4.0),
            AngleSample::new(1.6, 6.0),
            AngleSample::new(2.0, 8.0),
            AngleSample::new(2.5, 0.0),
        ];
        let output = resampler.apply(&input);

        assert_eq!(output.len(), 4);
        assert_relative_eq!(output[1].time, 0.75, epsilon = 1e-12);
        assert_relative_eq!(output[1].angle, 3.0);
        assert_relative_eq!(output[2].time, 1.8, epsilon = 1e-12);
        assert_relative_eq!(output[2].angle, 7.0);
        assert_eq!(output[3], input[5]);
    }

    #[test]
    fn test_preserves_endpoints() {
        let resampler = Resampler::new(3);
        let input = series(30.0, &(0..95).map(f64::from).collect::<Vec<_>>());
        let output = resampler.apply(&input);

        assert_eq!(output.first(), input.first());
        assert_eq!(output.last(), input.last());
        assert!(output.windows(2).all(|w| w[0].time < w[1].time));
        assert_eq!(output.len(), 2 + 31);
    }

    #[test]
    fn test_one_key_per_window_is_identity() {
        let resampler = Resampler::new(1);
        let input = series(30.0, &[1.0, 4.0, 2.0, 8.0, 5.0]);
        assert_eq!(resampler.apply(&input), input);
    }

    #[test]
    fn test_short_series_unchanged() {
        let resampler = Resampler::new(2);
        assert!(resampler.apply(&[]).is_empty());
        let one = series(30.0, &[1.0]);
        assert_eq!(resampler.apply(&one), one);
        let two = series(30.0, &[1.0, 2.0]);
        assert_eq!(resampler.apply(&two), two);
    }

    #[test]
    #[should_panic(expected = "Keys per second must be greater than 0")]
    fn test_zero_keys_panics() {
        let _ = Resampler::new(0);
    }
}
