//! Shared ADC channels
//!
//! The RP2040 has a single converter multiplexed over four pins. Each
//! sampler owns an [`AdcInput`] holding its channel and a shared borrow of
//! the converter, so conversions from different samplers never overlap.

use core::cell::RefCell;

use embassy_rp::adc::{Adc, Blocking, Channel};
use gripdrive_core::traits::{AnalogInput, SensorError};

/// ADC reference voltage on the board (mV)
pub const VREF_MV: u32 = 3300;

/// Full-scale code of the 12-bit converter
pub const ADC_MAX: u32 = 4095;

/// Convert a raw 12-bit code to millivolts at the pin
pub const fn code_to_millivolts(code: u16) -> u32 {
    code as u32 * VREF_MV / ADC_MAX
}

/// One analog pin on the shared converter
pub struct AdcInput<'a> {
    adc: &'a RefCell<Adc<'static, Blocking>>,
    channel: Channel<'static>,
}

impl<'a> AdcInput<'a> {
    pub fn new(adc: &'a RefCell<Adc<'static, Blocking>>, channel: Channel<'static>) -> Self {
        Self { adc, channel }
    }
}

impl AnalogInput for AdcInput<'_> {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        let mut adc = self
            .adc
            .try_borrow_mut()
            .map_err(|_| SensorError::ChannelBusy)?;
        adc.blocking_read(&mut self.channel)
            .map_err(|_| SensorError::ConversionError)
    }

    fn read_millivolts(&mut self) -> Result<u32, SensorError> {
        self.read_raw().map(code_to_millivolts)
    }
}
