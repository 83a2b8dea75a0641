//! Keyframe tangents for smooth playback between retained samples.

use crate::extraction::AngleSample;

/// A keyframe of a bone rotation curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    /// Seconds from the start of the clip
    pub time: f64,
    /// Rotation in degrees
    pub angle: f64,
    /// Slope used as both in and out tangent, in degrees per second
    pub tangent: f64,
}

/// Central-difference slope at `index`; zero at both ends of the series
#[must_use]
pub fn compute_tangent(samples: &[AngleSample], index: usize) -> f64 {
    if index == 0 || index + 1 >= samples.len() {
        return 0.0;
    }
    let previous = samples[index - 1];
    let next = samples[index + 1];
    (next.angle - previous.angle) / (next.time - previous.time)
}

/// Attach tangents to every sample of a series
#[must_use]
pub fn to_keyframes(samples: &[AngleSample]) -> Vec<Keyframe> {
    samples
        .iter()
        .enumerate()
        .map(|(index, sample)| Keyframe {
            time: sample.time,
            angle: sample.angle,
            tangent: compute_tangent(samples, index),
        })
        .collect()
}
