//! Confidence-gated decoding of joints from a detector keypoint array.

use crate::constants::KEYPOINT_STRIDE;

/// A detected keypoint in normalised image coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    /// Horizontal position
    pub x: f64,
    /// Vertical position, growing downwards
    pub y: f64,
    /// Detector certainty in [0, 1]
    pub confidence: f64,
}

impl Keypoint {
    /// Read the keypoint of a joint from an interleaved `(x, y, confidence)` array
    #[must_use]
    pub fn from_slice(keypoints: &[f64], joint: usize) -> Option<Self> {
        let offset = joint.checked_mul(KEYPOINT_STRIDE)?;
        match keypoints.get(offset..offset.checked_add(KEYPOINT_STRIDE)?)? {
            &[x, y, confidence] => Some(Self { x, y, confidence }),
            _ => None,
        }
    }
}

/// A decoded joint position with the vertical axis pointing up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2 {
    /// Horizontal position
    pub x: f64,
    /// Vertical position, growing upwards
    pub y: f64,
}

impl Point2 {
    /// Create a point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise midpoint of two points
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Angle of the vector from `self` to `other`, in degrees
    #[must_use]
    pub fn angle_to(self, other: Self) -> f64 {
        (other.y - self.y).atan2(other.x - self.x).to_degrees()
    }
}

/// Decodes joints of one frame, dropping those below a confidence threshold
#[derive(Debug, Clone, Copy)]
pub struct KeypointDecoder {
    min_confidence: f64,
}

impl KeypointDecoder {
    /// Create a decoder
    #[must_use]
    pub const fn new(min_confidence: f64) -> Self {
        Self { min_confidence }
    }

    /// Decode a joint position.
    ///
    /// Integral joints are read directly; the vertical axis is flipped so
    /// that it grows upwards. Fractional joints are the midpoint of the two
    /// joints that bracket them and need both to be confident. Joints past
    /// the end of the array count as undetected.
    #[must_use]
    pub fn decode(&self, keypoints: &[f64], joint: f64) -> Option<Point2> {
        if !joint.is_finite() || joint < 0.0 {
            return None;
        }
        if joint.fract() == 0.0 {
            self.decode_integral(keypoints, joint)
        } else {
            let low = self.decode_integral(keypoints, joint.floor())?;
            let high = self.decode_integral(keypoints, joint.ceil())?;
            Some(low.midpoint(high))
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Integral and non-negative
    fn decode_integral(&self, keypoints: &[f64], joint: f64) -> Option<Point2> {
        let keypoint = Keypoint::from_slice(keypoints, joint as usize)?;
        (keypoint.confidence >= self.min_confidence).then(|| Point2::new(keypoint.x, 1.0 - keypoint.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const FRAME: [f64; 9] = [
        0.2, 0.4, 0.9, // joint 0
        0.6, 0.8, 0.7, // joint 1
        0.5, 0.5, 0.3, // joint 2, low confidence
    ];

    #[test]
    fn test_integral_joint_flips_y() {
        let decoder = KeypointDecoder::new(0.6);
        let point = decoder.decode(&FRAME, 1.0).unwrap();
        assert_relative_eq!(point.x, 0.6);
        assert_relative_eq!(point.y, 0.2);
    }

    #[test]
    fn test_low_confidence_is_dropped() {
        let decoder = KeypointDecoder::new(0.6);
        assert!(decoder.decode(&FRAME, 2.0).is_none());
        // Threshold is inclusive
        assert!(KeypointDecoder::new(0.3).decode(&FRAME, 2.0).is_some());
    }

    #[test]
    fn test_fractional_joint_averages_neighbours() {
        let decoder = KeypointDecoder::new(0.6);
        let point = decoder.decode(&FRAME, 0.5).unwrap();
        assert_relative_eq!(point.x, 0.4);
        assert_relative_eq!(point.y, 0.4);
    }

    #[test]
    fn test_fractional_joint_needs_both_neighbours() {
        let decoder = KeypointDecoder::new(0.6);
        assert!(decoder.decode(&FRAME, 1.5).is_none());
    }

    #[test]
    fn test_out_of_range_joint() {
        let decoder = KeypointDecoder::new(0.0);
        assert!(decoder.decode(&FRAME, 3.0).is_none());
        assert!(decoder.decode(&FRAME[..7], 2.0).is_none());
        assert!(decoder.decode(&FRAME, -1.0).is_none());
    }

    #[test]
    fn test_angle_to() {
        let origin = Point2::new(0.0, 0.0);
        assert_relative_eq!(origin.angle_to(Point2::new(1.0, 0.0)), 0.0);
        assert_relative_eq!(origin.angle_to(Point2::new(0.0, 1.0)), 90.0);
        assert_relative_eq!(origin.angle_to(Point2::new(-1.0, 0.0)), 180.0);
        assert_relative_eq!(origin.angle_to(Point2::new(0.0, -1.0)), -90.0);
    }
}
