//! NTC thermistor temperature sensor
//!
//! The thermistor forms a divider with a fixed series resistor. The
//! averaged ADC code is turned into the NTC resistance and then into a
//! temperature with the Beta equation:
//!
//! ```text
//! 1/T = 1/T0 + ln(R/R0) / B
//! ```
//!
//! Codes are clamped to `[1, ADC_MAX - 1]` before any ratio or log math so
//! a shorted or open sensor still yields a finite value.

use gripdrive_core::config::{ThermistorConfig, ThermistorPlacement};
use gripdrive_core::sensor::{SampleGate, SampleStatus, SensorReading};
use gripdrive_core::traits::{AnalogInput, Sensor};
use micromath::F32Ext;

use super::average;

const KELVIN_OFFSET: f32 = 273.15;

/// NTC thermistor sampler
pub struct NtcThermistor<A> {
    adc: A,
    config: ThermistorConfig,
    gate: SampleGate,
    reading: SensorReading,
}

impl<A> NtcThermistor<A> {
    /// Create a new thermistor sampler
    ///
    /// A full scale below 2 leaves no code inside the clamp range and is
    /// raised to 2.
    pub fn new(adc: A, config: &ThermistorConfig, now_ms: u32) -> Self {
        let config = ThermistorConfig {
            adc_max: config.adc_max.max(2),
            ..*config
        };

        Self {
            adc,
            config,
            gate: SampleGate::new(config.sample_interval_ms, now_ms),
            reading: SensorReading::new(),
        }
    }

    /// Convert an ADC code to NTC resistance (ohms)
    ///
    /// High side: `VCC -- NTC -- ADC_PIN -- R_series -- GND`
    /// gives `R = R_series * (ADC_MAX - code) / code`.
    ///
    /// Low side: `VCC -- R_series -- ADC_PIN -- NTC -- GND`
    /// gives `R = R_series * code / (ADC_MAX - code)`.
    pub fn code_to_resistance(&self, code: f32) -> f32 {
        let max = self.config.adc_max as f32;
        let code = code.clamp(1.0, max - 1.0);

        match self.config.placement {
            ThermistorPlacement::HighSide => self.config.series_ohms * (max - code) / code,
            ThermistorPlacement::LowSide => self.config.series_ohms * code / (max - code),
        }
    }

    /// Convert NTC resistance to °C with the Beta equation
    pub fn resistance_to_celsius(&self, resistance: f32) -> f32 {
        let inv_t = 1.0 / self.config.t0_kelvin
            + (resistance / self.config.r0_ohms).ln() / self.config.beta;
        1.0 / inv_t - KELVIN_OFFSET
    }

    /// Convert an ADC code straight to °C
    pub fn code_to_celsius(&self, code: f32) -> f32 {
        self.resistance_to_celsius(self.code_to_resistance(code))
    }

    /// Last temperature (°C)
    pub fn celsius(&self) -> f32 {
        self.reading.value
    }
}

impl<A: AnalogInput> Sensor for NtcThermistor<A> {
    fn update(&mut self, now_ms: u32) -> SampleStatus {
        if self.gate.poll(now_ms).is_none() {
            return SampleStatus::Idle;
        }

        let adc = &mut self.adc;
        let code = match average(self.config.samples, || adc.read_raw().map(u32::from)) {
            Ok(code) => code,
            Err(e) => return SampleStatus::Failed(e),
        };

        let celsius = self.code_to_celsius(code);
        self.reading.publish(code, celsius, now_ms);

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

    struct FixedAdc(u16);

    impl AnalogInput for FixedAdc {
        fn read_raw(&mut self) -> Result<u16, SensorError> {
            Ok(self.0)
        }

        fn read_millivolts(&mut self) -> Result<u32, SensorError> {
            Ok(self.0 as u32 * 3300 / 4095)
        }
    }

    fn sensor(placement: ThermistorPlacement) -> NtcThermistor<FixedAdc> {
        let config = ThermistorConfig {
            placement,
            ..ThermistorConfig::default()
        };
        NtcThermistor::new(FixedAdc(2048), &config, 0)
    }

    #[test]
    fn test_reference_resistance_is_25c() {
        let ntc = sensor(ThermistorPlacement::HighSide);
        let temp = ntc.resistance_to_celsius(10_000.0);
        assert!((temp - 25.0).abs() < 0.1, "got {}", temp);
    }

    #[test]
    fn test_known_beta_points() {
        let ntc = sensor(ThermistorPlacement::HighSide);

        // B = 3950, R0 = 10k: ~3.6k at 50 °C, ~33.6k at 0 °C
        let hot = ntc.resistance_to_celsius(3_588.0);
        assert!((hot - 50.0).abs() < 1.0, "got {}", hot);

        let cold = ntc.resistance_to_celsius(33_620.0);
        assert!(cold.abs() < 1.0, "got {}", cold);
    }

    #[test]
    fn test_high_side_resistance() {
        let ntc = sensor(ThermistorPlacement::HighSide);
        // Mid-scale: NTC equals the series resistor
        let r = ntc.code_to_resistance(4095.0 / 2.0);
        assert!((r - 10_000.0).abs() < 1.0);

        let temp = ntc.code_to_celsius(4095.0 / 2.0);
        assert!((temp - 25.0).abs() < 0.1);
    }

    #[test]
    fn test_low_side_resistance() {
        let ntc = sensor(ThermistorPlacement::LowSide);
        // A quarter of full scale: NTC is a third of the series resistor
        let r = ntc.code_to_resistance(4095.0 / 4.0);
        assert!((r - 10_000.0 / 3.0).abs() < 1.0);
    }

    #[test]
    fn test_lower_code_is_colder_on_high_side() {
        let ntc = sensor(ThermistorPlacement::HighSide);

        let mut previous = ntc.code_to_celsius(200.0);
        for code in (400..=3800).step_by(200) {
            let temp = ntc.code_to_celsius(code as f32);
            assert!(temp > previous, "code {} gave {} after {}", code, temp, previous);
            previous = temp;
        }
    }

    #[test]
    fn test_lower_code_is_hotter_on_low_side() {
        let ntc = sensor(ThermistorPlacement::LowSide);
        assert!(ntc.code_to_celsius(1000.0) > ntc.code_to_celsius(3000.0));
    }

    #[test]
    fn test_degenerate_codes_stay_finite() {
        for placement in [ThermistorPlacement::HighSide, ThermistorPlacement::LowSide] {
            let ntc = sensor(placement);
            assert!(ntc.code_to_celsius(0.0).is_finite());
            assert!(ntc.code_to_celsius(4095.0).is_finite());
            assert_eq!(ntc.code_to_resistance(0.0), ntc.code_to_resistance(1.0));
            assert_eq!(ntc.code_to_resistance(4095.0), ntc.code_to_resistance(4094.0));
        }
    }

    #[test]
    fn test_tiny_full_scale_does_not_panic() {
        for adc_max in [0, 1, 2] {
            let config = ThermistorConfig {
                adc_max,
                ..ThermistorConfig::default()
            };
            let mut ntc = NtcThermistor::new(FixedAdc(0), &config, 0);

            assert!(ntc.code_to_celsius(0.0).is_finite(), "adc_max {}", adc_max);
            assert_eq!(ntc.update(250), SampleStatus::Sampled);
            assert!(ntc.celsius().is_finite());
        }
    }

    #[test]
    fn test_update_publishes_average_code() {
        let mut ntc = sensor(ThermistorPlacement::HighSide);

        assert_eq!(ntc.update(100), SampleStatus::Idle);
        assert_eq!(ntc.update(250), SampleStatus::Sampled);

        let reading = ntc.reading();
        assert!(reading.ready);
        assert_eq!(reading.raw, 2048.0);
        assert!((ntc.celsius() - 25.0).abs() < 0.2);
    }
}
