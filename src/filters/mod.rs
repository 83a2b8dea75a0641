//! Smoothing stages applied to a bone's angle series.
//!
//! Every stage takes a time-ascending series and returns a new one that is
//! still time-ascending and keeps the first and last sample's timestamps.

/// Removal of short-period oscillation
pub mod trembling;

/// Error-bounded piecewise-linear simplification
pub mod multi_line_fitting;

/// Keyframe density capping by windowed averaging
pub mod resample;

use crate::extraction::AngleSample;
use crate::{Error, Result};

/// Trait for all series filters
pub trait SeriesFilter: Send + Sync {
    /// Filter a time-ascending series
    fn apply(&self, samples: &[AngleSample]) -> Vec<AngleSample>;

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes samples through unchanged
pub struct NoFilter;

impl SeriesFilter for NoFilter {
    fn apply(&self, samples: &[AngleSample]) -> Vec<AngleSample> {
        samples.to_vec()
    }

    fn name(&self) -> &str {
        "NoFilter"
    }
}

fn parse_param<T: std::str::FromStr>(filter_type: &str, value: Option<&str>) -> Result<T> {
    let value = value.ok_or_else(|| Error::InvalidInput(format!("Filter {filter_type} needs a parameter")))?;
    value
        .parse()
        .map_err(|_| Error::InvalidInput(format!("Invalid parameter for {filter_type}: {value}")))
}

/// Create a series filter from a `name:parameter` description.
///
/// Recognised forms are `none`, `trembling:<min frequency>`,
/// `mlf:<max error ratio>` and `resample:<max keys per second>`.
///
/// # Errors
///
/// Returns an error for an unknown name or an invalid parameter
pub fn create_filter(description: &str) -> Result<Box<dyn SeriesFilter>> {
    let mut parts = description.splitn(2, ':');
    let filter_type = parts.next().unwrap_or_default().trim().to_lowercase();
    let param = parts.next().map(str::trim);

    match filter_type.as_str() {
        "none" | "nofilter" => Ok(Box::new(NoFilter)),
        "trembling" => {
            let frequency: f64 = parse_param(&filter_type, param)?;
            trembling::TremblingFilter::from_frequency(frequency)
                .map(|f| Box::new(f) as Box<dyn SeriesFilter>)
                .ok_or_else(|| Error::InvalidInput(format!("Trembling frequency must be positive, got {frequency}")))
        }
        "mlf" | "multi_line_fitting" => {
            let ratio: f64 = parse_param(&filter_type, param)?;
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(Error::InvalidInput(format!("MLF error ratio must be in (0, 1], got {ratio}")));
            }
            Ok(Box::new(multi_line_fitting::MultiLineFitting::new(ratio)))
        }
        "resample" => {
            let keys: usize = parse_param(&filter_type, param)?;
            if keys == 0 {
                return Err(Error::InvalidInput("Keys per second must be greater than 0".to_string()));
            }
            Ok(Box::new(resample::Resampler::new(keys)))
        }
        _ => Err(Error::InvalidInput(format!("Unknown filter type: {description}"))),
    }
}
