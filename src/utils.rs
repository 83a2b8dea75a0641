//! Angle helpers shared by extraction and configuration.

use crate::constants::FULL_TURN_DEGREES;

/// Wrap an angle into [0, 360)
#[must_use]
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(FULL_TURN_DEGREES);
    // rem_euclid can round up to exactly one turn for tiny negative inputs
    if wrapped >= FULL_TURN_DEGREES {
        0.0
    } else {
        wrapped
    }
}

/// Pick whichever of `angle`, `angle + 360` and `angle - 360` lies closest
/// to `previous`. Ties keep the earliest candidate in that order.
#[must_use]
pub fn closest_equivalent_angle(angle: f64, previous: f64) -> f64 {
    let mut best = angle;
    let mut best_diff = (angle - previous).abs();
    for candidate in [angle + FULL_TURN_DEGREES, angle - FULL_TURN_DEGREES] {
        let diff = (candidate - previous).abs();
        if diff < best_diff {
            best = candidate;
            best_diff = diff;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
        assert!(normalize_degrees(-1e-20) < 360.0);
    }

    #[test]
    fn test_closest_equivalent_angle() {
        assert_eq!(closest_equivalent_angle(355.0, 5.0), -5.0);
        assert_eq!(closest_equivalent_angle(358.0, 5.0), -2.0);
        assert_eq!(closest_equivalent_angle(5.0, 355.0), 365.0);
        assert_eq!(closest_equivalent_angle(10.0, 20.0), 10.0);
        // Exactly half a turn away keeps the raw angle
        assert_eq!(closest_equivalent_angle(180.0, 0.0), 180.0);
    }

    proptest! {
        #[test]
        fn prop_normalized_in_range(angle in -1e6f64..1e6) {
            let wrapped = normalize_degrees(angle);
            prop_assert!((0.0..360.0).contains(&wrapped));
        }

        #[test]
        fn prop_closest_is_minimal(angle in 0.0f64..360.0, previous in -1000.0f64..1000.0) {
            let chosen = closest_equivalent_angle(angle, previous);
            let diff = (chosen - previous).abs();
            prop_assert!(diff <= (angle - previous).abs());
            prop_assert!(diff <= (angle + 360.0 - previous).abs());
            prop_assert!(diff <= (angle - 360.0 - previous).abs());
        }
    }
}
