//! Two-point linear calibration
//!
//! A calibration profile is described by two reference pairs: a value
//! measured with a trusted instrument and the value the device reported
//! for it at the same moment. The pairs are reduced once to a slope and an
//! offset which are then applied to every measurement.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::types::ConfigError;

/// One calibration reference pair
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalibrationPoint {
    /// Value read from the reference instrument
    pub true_value: f32,
    /// Value the device measured at the same time
    pub measured: f32,
}

impl CalibrationPoint {
    /// Create a new reference pair
    pub const fn new(true_value: f32, measured: f32) -> Self {
        Self {
            true_value,
            measured,
        }
    }
}

/// Slope/offset correction with a clamped output range
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinearCalibration {
    slope: f32,
    offset: f32,
    min: f32,
    max: f32,
}

impl LinearCalibration {
    /// Pass-through calibration (slope 1, offset 0)
    pub const fn identity(min: f32, max: f32) -> Self {
        Self {
            slope: 1.0,
            offset: 0.0,
            min,
            max,
        }
    }

    /// Derive slope and offset from two reference pairs
    ///
    /// Fails if both pairs share the same measured value, since no line
    /// can be fitted through them.
    pub fn from_points(
        a: CalibrationPoint,
        b: CalibrationPoint,
        min: f32,
        max: f32,
    ) -> Result<Self, ConfigError> {
        let span = b.measured - a.measured;
        if span == 0.0 || !span.is_finite() {
            return Err(ConfigError::DegenerateCalibration);
        }
        if min > max {
            return Err(ConfigError::InvalidRange);
        }

        let slope = (b.true_value - a.true_value) / span;
        let offset = a.true_value - slope * a.measured;

        Ok(Self {
            slope,
            offset,
            min,
            max,
        })
    }

    /// Slope of the correction line
    pub fn slope(&self) -> f32 {
        self.slope
    }

    /// Offset of the correction line
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Apply the correction without clamping
    pub fn correct(&self, measured: f32) -> f32 {
        measured * self.slope + self.offset
    }

    /// Apply the correction and clamp into the valid range
    pub fn apply(&self, measured: f32) -> f32 {
        self.correct(measured).clamp(self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn battery_profile() -> LinearCalibration {
        LinearCalibration::from_points(
            CalibrationPoint::new(12.0, 11.64),
            CalibrationPoint::new(36.0, 35.28),
            0.0,
            60.0,
        )
        .unwrap()
    }

    #[test]
    fn test_reference_points_reproduced() {
        let cal = battery_profile();
        assert!((cal.apply(11.64) - 12.0).abs() < 1e-4);
        assert!((cal.apply(35.28) - 36.0).abs() < 1e-4);
    }

    #[test]
    fn test_slope_and_offset() {
        let cal = battery_profile();
        // 24 / 23.64
        assert!((cal.slope() - 1.015_228).abs() < 1e-4);
        assert!((cal.offset() - (12.0 - cal.slope() * 11.64)).abs() < 1e-6);
    }

    #[test]
    fn test_clamped_to_range() {
        let cal = battery_profile();
        assert_eq!(cal.apply(-5.0), 0.0);
        assert_eq!(cal.apply(100.0), 60.0);
        assert!(cal.correct(100.0) > 60.0);
    }

    #[test]
    fn test_degenerate_points_rejected() {
        let result = LinearCalibration::from_points(
            CalibrationPoint::new(12.0, 10.0),
            CalibrationPoint::new(36.0, 10.0),
            0.0,
            60.0,
        );
        assert_eq!(result, Err(ConfigError::DegenerateCalibration));
    }

    #[test]
    fn test_identity() {
        let cal = LinearCalibration::identity(0.0, 60.0);
        assert_eq!(cal.apply(24.5), 24.5);
        assert_eq!(cal.apply(75.0), 60.0);
    }

    proptest! {
        #[test]
        fn test_reference_pairs_round_trip(
            true_a in 0.0f32..60.0,
            true_b in 0.0f32..60.0,
            meas_a in 0.0f32..60.0,
            gap in 0.5f32..30.0,
        ) {
            let meas_b = meas_a + gap;
            let cal = LinearCalibration::from_points(
                CalibrationPoint::new(true_a, meas_a),
                CalibrationPoint::new(true_b, meas_b),
                -1000.0,
                1000.0,
            )
            .unwrap();

            prop_assert!((cal.apply(meas_a) - true_a).abs() < 1e-2);
            prop_assert!((cal.apply(meas_b) - true_b).abs() < 1e-2);
        }

        #[test]
        fn test_output_stays_in_range(measured in -500.0f32..500.0) {
            let cal = battery_profile();
            let v = cal.apply(measured);
            prop_assert!((0.0..=60.0).contains(&v));
        }
    }
}
