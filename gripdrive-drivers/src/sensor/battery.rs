//! Battery voltage monitor
//!
//! The battery is measured through a resistor divider:
//!
//! ```text
//! VBAT -- R_top -- ADC_PIN -- R_bottom -- GND
//! ```
//!
//! Each window averages the pin voltage, scales it back up by the divider
//! ratio, then corrects it with a two-point calibration and clamps it to
//! the configured range. The uncorrected voltage is kept as the raw value.

use gripdrive_core::config::{BatteryConfig, ConfigError, LinearCalibration};
use gripdrive_core::sensor::{SampleGate, SampleStatus, SensorReading};
use gripdrive_core::traits::{AnalogInput, Sensor};

use super::average;

/// Battery voltage sampler
pub struct BatteryMonitor<A> {
    adc: A,
    samples: u8,
    divider_ratio: f32,
    calibration: LinearCalibration,
    gate: SampleGate,
    reading: SensorReading,
}

impl<A: AnalogInput> BatteryMonitor<A> {
    /// Create a monitor calibrated from the configured reference pairs
    ///
    /// Fails if the reference pairs cannot define a line.
    pub fn new(adc: A, config: &BatteryConfig, now_ms: u32) -> Result<Self, ConfigError> {
        let calibration = LinearCalibration::from_points(
            config.cal_low,
            config.cal_high,
            config.min_volts,
            config.max_volts,
        )?;
        Ok(Self::with_calibration(adc, config, calibration, now_ms))
    }

    /// Create a monitor with an explicit calibration
    pub fn with_calibration(
        adc: A,
        config: &BatteryConfig,
        calibration: LinearCalibration,
        now_ms: u32,
    ) -> Self {
        Self {
            adc,
            samples: config.samples,
            divider_ratio: config.divider_ratio(),
            calibration,
            gate: SampleGate::new(config.sample_interval_ms, now_ms),
            reading: SensorReading::new(),
        }
    }

    /// Calibration in use
    pub fn calibration(&self) -> &LinearCalibration {
        &self.calibration
    }

    /// Battery voltage before calibration
    pub fn raw_volts(&self) -> f32 {
        self.reading.raw
    }

    /// Calibrated battery voltage
    pub fn volts(&self) -> f32 {
        self.reading.value
    }
}

impl<A: AnalogInput> Sensor for BatteryMonitor<A> {
    fn update(&mut self, now_ms: u32) -> SampleStatus {
        if self.gate.poll(now_ms).is_none() {
            return SampleStatus::Idle;
        }

        let adc = &mut self.adc;
        let pin_mv = match average(self.samples, || adc.read_millivolts()) {
            Ok(mv) => mv,
            Err(e) => return SampleStatus::Failed(e),
        };

        let raw = pin_mv / 1000.0 * self.divider_ratio;
        let value = self.calibration.apply(raw);
        self.reading.publish(raw, value, now_ms);

        SampleStatus::Sampled
    }

    fn reading(&self) -> SensorReading {
        self.reading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gripdrive_core::traits::SensorError;

    struct FakeAdc {
        millivolts: u32,
        fail: bool,
        reads: u32,
    }

    impl FakeAdc {
        fn new(millivolts: u32) -> Self {
            Self {
                millivolts,
                fail: false,
                reads: 0,
            }
        }
    }

    impl AnalogInput for FakeAdc {
        fn read_raw(&mut self) -> Result<u16, SensorError> {
            Ok((self.millivolts * 4095 / 3300) as u16)
        }

        fn read_millivolts(&mut self) -> Result<u32, SensorError> {
            self.reads += 1;
            if self.fail {
                Err(SensorError::ConversionError)
            } else {
                Ok(self.millivolts)
            }
        }
    }

    fn monitor(millivolts: u32) -> BatteryMonitor<FakeAdc> {
        BatteryMonitor::new(FakeAdc::new(millivolts), &BatteryConfig::default(), 0).unwrap()
    }

    #[test]
    fn test_first_sample_after_one_interval() {
        let mut battery = monitor(1500);

        assert_eq!(battery.update(0), SampleStatus::Idle);
        assert_eq!(battery.update(249), SampleStatus::Idle);
        assert!(!battery.is_ready());
        assert_eq!(battery.adc.reads, 0);

        assert_eq!(battery.update(250), SampleStatus::Sampled);
        assert!(battery.is_ready());
        assert_eq!(battery.adc.reads, 8);
        assert_eq!(battery.reading().last_sample_ms, 250);
    }

    #[test]
    fn test_divider_and_calibration() {
        // 2.205 V on the pin is 35.28 V at the battery, the upper reference
        let mut battery = monitor(2205);
        battery.update(250);

        assert!((battery.raw_volts() - 35.28).abs() < 1e-3);
        assert!((battery.volts() - 36.0).abs() < 1e-3);
    }

    #[test]
    fn test_raw_volts_follow_divider_ratio() {
        let mut battery = monitor(1500);
        battery.update(250);

        assert!((battery.raw_volts() - 24.0).abs() < 1e-3);
        assert!(battery.volts() > battery.raw_volts());
    }

    #[test]
    fn test_clamped_to_range() {
        // 4.0 V on the pin would be 64 V
        let mut battery = monitor(4000);
        battery.update(250);
        assert_eq!(battery.volts(), 60.0);

        // An empty pin reads as the calibration offset, never negative
        let mut battery = monitor(0);
        battery.update(250);
        assert!((battery.volts() - battery.calibration().offset()).abs() < 1e-6);
        assert!(battery.volts() >= 0.0);
    }

    #[test]
    fn test_failed_window_keeps_reading() {
        let mut battery = monitor(1500);
        battery.update(250);
        let before = battery.reading();

        battery.adc.fail = true;
        assert_eq!(
            battery.update(500),
            SampleStatus::Failed(SensorError::ConversionError)
        );
        assert_eq!(battery.reading(), before);

        // Next window is one interval after the failed one
        battery.adc.fail = false;
        battery.adc.millivolts = 2205;
        assert_eq!(battery.update(700), SampleStatus::Idle);
        assert_eq!(battery.update(750), SampleStatus::Sampled);
        assert!((battery.volts() - 36.0).abs() < 1e-3);
    }

    #[test]
    fn test_rejects_degenerate_calibration() {
        let mut config = BatteryConfig::default();
        config.cal_high.measured = config.cal_low.measured;

        let result = BatteryMonitor::new(FakeAdc::new(0), &config, 0);
        assert!(matches!(result, Err(ConfigError::DegenerateCalibration)));
    }
}
