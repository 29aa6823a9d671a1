//! Sampler implementations
//!
//! Every sampler is time-gated through a
//! [`SampleGate`](gripdrive_core::sensor::SampleGate) and publishes one
//! [`SensorReading`](gripdrive_core::sensor::SensorReading):
//!
//! - [`BatteryMonitor`]: resistor divider with two-point calibration
//! - [`NtcThermistor`]: Beta-equation NTC in a divider
//! - [`Tachometer`]: pulse rate from an interrupt-fed counter

pub mod battery;
pub mod ntc;
pub mod tachometer;

pub use battery::BatteryMonitor;
pub use ntc::NtcThermistor;
pub use tachometer::{PulseCounter, Tachometer};

use gripdrive_core::traits::SensorError;

/// Average `samples` consecutive reads
///
/// The first failed read aborts the whole window.
pub(crate) fn average<F>(samples: u8, mut read: F) -> Result<f32, SensorError>
where
    F: FnMut() -> Result<u32, SensorError>,
{
    let samples = samples.max(1);
    let mut sum: u32 = 0;
    for _ in 0..samples {
        sum = sum.saturating_add(read()?);
    }
    Ok(sum as f32 / samples as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average() {
        let mut values = [100u32, 200, 300, 400].into_iter();
        let avg = average(4, || Ok(values.next().unwrap_or(0))).unwrap();
        assert!((avg - 250.0).abs() < 1e-6);
    }

    #[test]
    fn test_average_aborts_on_error() {
        let mut calls = 0;
        let result = average(8, || {
            calls += 1;
            if calls == 3 {
                Err(SensorError::ConversionError)
            } else {
                Ok(1)
            }
        });
        assert_eq!(result, Err(SensorError::ConversionError));
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_zero_samples_reads_once() {
        let avg = average(0, || Ok(42)).unwrap();
        assert!((avg - 42.0).abs() < 1e-6);
    }
}
