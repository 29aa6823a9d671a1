//! Analog input and sensor traits

use crate::sensor::{SampleStatus, SensorReading};

/// Errors that can occur while reading an analog channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// ADC conversion error
    ConversionError,
    /// The shared converter was busy with another channel
    ChannelBusy,
}

/// One ADC-fed analog channel
///
/// Takes `&mut self` because ADC reads typically require mutable access.
pub trait AnalogInput {
    /// Read the raw converter code (0..=full scale)
    fn read_raw(&mut self) -> Result<u16, SensorError>;

    /// Read the pin voltage in millivolts
    fn read_millivolts(&mut self) -> Result<u32, SensorError>;
}

/// A time-gated sampler owning one [`SensorReading`]
///
/// `update` is called on every pass of the control loop and must return
/// immediately when the sampler is not due.
pub trait Sensor {
    /// Sample if the sampling interval has elapsed
    fn update(&mut self, now_ms: u32) -> SampleStatus;

    /// Last published reading
    fn reading(&self) -> SensorReading;

    /// Whether at least one sample window has completed
    fn is_ready(&self) -> bool {
        self.reading().ready
    }
}
