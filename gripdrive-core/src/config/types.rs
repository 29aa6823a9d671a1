//! Configuration type definitions
//!
//! These types describe one physical tool: its sensor front-ends, input
//! timing, motor PWM stage and indicator strip. Every struct carries the
//! values of the reference hardware in its `Default` implementation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::calibration::CalibrationPoint;
use crate::traits::Rgb;

/// Maximum number of pixels on the indicator strip
pub const MAX_LEDS: usize = 16;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Calibration points share the same measured value
    DegenerateCalibration,
    /// Lower clamp bound is above the upper one
    InvalidRange,
    /// Divider or series resistor is zero or negative
    InvalidResistor,
    /// Thermistor model parameters are out of range
    InvalidThermistor,
    /// ADC full-scale code too small to be usable
    InvalidAdcRange,
    /// Tachometer configured with zero pulses per revolution
    ZeroPulsesPerRevolution,
    /// LED count is zero or larger than [`MAX_LEDS`]
    InvalidLedCount,
    /// Sampler configured to take zero samples
    ZeroSamples,
    /// A timing interval is zero
    ZeroInterval,
}

/// Where the NTC sits in its voltage divider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ThermistorPlacement {
    /// NTC between supply and ADC pin, fixed resistor to ground
    #[default]
    HighSide,
    /// Fixed resistor between supply and ADC pin, NTC to ground
    LowSide,
}

/// Battery voltage front-end
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BatteryConfig {
    /// Divider resistor between battery and ADC pin (ohms)
    pub r_top_ohms: f32,
    /// Divider resistor between ADC pin and ground (ohms)
    pub r_bottom_ohms: f32,
    /// Lower calibration reference pair (volts)
    pub cal_low: CalibrationPoint,
    /// Upper calibration reference pair (volts)
    pub cal_high: CalibrationPoint,
    /// Lowest reportable voltage
    pub min_volts: f32,
    /// Highest reportable voltage
    pub max_volts: f32,
    /// Minimum time between sample windows (ms)
    pub sample_interval_ms: u32,
    /// ADC readings averaged per window
    pub samples: u8,
}

impl BatteryConfig {
    /// Divider gain from pin voltage back to battery voltage
    pub fn divider_ratio(&self) -> f32 {
        (self.r_top_ohms + self.r_bottom_ohms) / self.r_bottom_ohms
    }
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            r_top_ohms: 330_000.0,
            r_bottom_ohms: 22_000.0,
            cal_low: CalibrationPoint::new(12.0, 11.64),
            cal_high: CalibrationPoint::new(36.0, 35.28),
            min_volts: 0.0,
            max_volts: 60.0,
            sample_interval_ms: 250,
            samples: 8,
        }
    }
}

/// NTC thermistor front-end
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ThermistorConfig {
    /// Position of the NTC in the divider
    pub placement: ThermistorPlacement,
    /// Fixed divider resistor (ohms)
    pub series_ohms: f32,
    /// NTC resistance at the reference temperature (ohms)
    pub r0_ohms: f32,
    /// Reference temperature (kelvin)
    pub t0_kelvin: f32,
    /// Beta material constant (kelvin)
    pub beta: f32,
    /// Full-scale ADC code (4095 for 12-bit)
    pub adc_max: u16,
    /// Minimum time between sample windows (ms)
    pub sample_interval_ms: u32,
    /// ADC readings averaged per window
    pub samples: u8,
}

impl Default for ThermistorConfig {
    fn default() -> Self {
        Self {
            placement: ThermistorPlacement::HighSide,
            series_ohms: 10_000.0,
            r0_ohms: 10_000.0,
            t0_kelvin: 298.15,
            beta: 3950.0,
            adc_max: 4095,
            sample_interval_ms: 250,
            samples: 8,
        }
    }
}

/// Motor speed feedback (FG output)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TachometerConfig {
    /// FG pulses emitted per shaft revolution
    pub pulses_per_rev: u8,
    /// Minimum time between rate computations (ms)
    pub update_interval_ms: u32,
}

impl Default for TachometerConfig {
    fn default() -> Self {
        Self {
            pulses_per_rev: 1,
            update_interval_ms: 200,
        }
    }
}

/// Trigger and step button handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InputConfig {
    /// Settle window for step buttons (ms)
    pub debounce_ms: u32,
    /// Speed change per accepted step press (percentage points)
    pub speed_step: u8,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 50,
            speed_step: 20,
        }
    }
}

/// PWM power stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotorConfig {
    /// PWM switching frequency (Hz); duty resolution is fixed at 8 bits
    pub pwm_frequency_hz: u32,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            pwm_frequency_hz: 1000,
        }
    }
}

/// Indicator pixel strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IndicatorConfig {
    /// Number of pixels on the strip
    pub led_count: u8,
    /// Global brightness applied by the strip (0-255)
    pub brightness: u8,
    /// Update interval for static and blink patterns (ms)
    pub default_period_ms: u16,
    /// Refresh interval for animated patterns (ms)
    pub animation_refresh_ms: u16,
    /// Pulse period of the boundary pixel when speed is zero (ms)
    pub idle_pulse_period_ms: u16,
    /// Time after power-on before the speed display takes over (ms)
    pub warmup_ms: u32,
    /// Color of the setup pulse shown during warm-up
    pub setup_color: Rgb,
    /// Pulse period of the setup indication (ms)
    pub setup_period_ms: u16,
    /// Speed display color while the motor is active
    pub active_color: Rgb,
    /// Speed display color while the motor is idle
    pub idle_color: Rgb,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            led_count: 5,
            brightness: 128,
            default_period_ms: 500,
            animation_refresh_ms: 10,
            idle_pulse_period_ms: 2000,
            warmup_ms: 2000,
            setup_color: Rgb::new(128, 128, 128),
            setup_period_ms: 2000,
            active_color: Rgb::new(255, 0, 0),
            idle_color: Rgb::new(0, 0, 255),
        }
    }
}

/// Complete tool configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ToolConfig {
    pub battery: BatteryConfig,
    pub thermistor: ThermistorConfig,
    pub tachometer: TachometerConfig,
    pub input: InputConfig,
    pub motor: MotorConfig,
    pub indicator: IndicatorConfig,
}

impl ToolConfig {
    /// Check the configuration for values the firmware cannot work with
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let battery = &self.battery;
        if battery.r_top_ohms < 0.0 || battery.r_bottom_ohms <= 0.0 {
            return Err(ConfigError::InvalidResistor);
        }
        if battery.cal_low.measured == battery.cal_high.measured {
            return Err(ConfigError::DegenerateCalibration);
        }
        if battery.min_volts > battery.max_volts {
            return Err(ConfigError::InvalidRange);
        }
        if battery.samples == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if battery.sample_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }

        let therm = &self.thermistor;
        if therm.series_ohms <= 0.0 {
            return Err(ConfigError::InvalidResistor);
        }
        if therm.r0_ohms <= 0.0 || therm.t0_kelvin <= 0.0 || therm.beta <= 0.0 {
            return Err(ConfigError::InvalidThermistor);
        }
        if therm.adc_max < 2 {
            return Err(ConfigError::InvalidAdcRange);
        }
        if therm.samples == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if therm.sample_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }

        if self.tachometer.pulses_per_rev == 0 {
            return Err(ConfigError::ZeroPulsesPerRevolution);
        }
        if self.tachometer.update_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }

        if self.motor.pwm_frequency_hz == 0 {
            return Err(ConfigError::ZeroInterval);
        }

        let indicator = &self.indicator;
        if indicator.led_count == 0 || indicator.led_count as usize > MAX_LEDS {
            return Err(ConfigError::InvalidLedCount);
        }
        if indicator.default_period_ms == 0
            || indicator.animation_refresh_ms == 0
            || indicator.idle_pulse_period_ms == 0
            || indicator.setup_period_ms == 0
        {
            return Err(ConfigError::ZeroInterval);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(ToolConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_divider_ratio() {
        let battery = BatteryConfig::default();
        assert!((battery.divider_ratio() - 16.0).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_equal_calibration_points() {
        let mut config = ToolConfig::default();
        config.battery.cal_high.measured = config.battery.cal_low.measured;
        assert_eq!(config.validate(), Err(ConfigError::DegenerateCalibration));
    }

    #[test]
    fn test_rejects_zero_pulses_per_rev() {
        let mut config = ToolConfig::default();
        config.tachometer.pulses_per_rev = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroPulsesPerRevolution));
    }

    #[test]
    fn test_rejects_bad_led_count() {
        let mut config = ToolConfig::default();
        config.indicator.led_count = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidLedCount));

        config.indicator.led_count = (MAX_LEDS + 1) as u8;
        assert_eq!(config.validate(), Err(ConfigError::InvalidLedCount));
    }

    #[test]
    fn test_rejects_zero_samples() {
        let mut config = ToolConfig::default();
        config.thermistor.samples = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroSamples));
    }

    #[test]
    fn test_rejects_tiny_adc_range() {
        let mut config = ToolConfig::default();
        config.thermistor.adc_max = 1;
        assert_eq!(config.validate(), Err(ConfigError::InvalidAdcRange));
    }
}
