//! PWM slice driving the motor gate
//!
//! The RP2040 PWM counter is 16 bits wide with an 8.4 fixed-point clock
//! divider. [`PwmTiming`] picks the smallest integer divider that reaches
//! the requested switching frequency so the counter keeps as much
//! resolution as possible, then maps 8-bit duty values onto it.
//!
//! Detaching forces the compare to zero while the slice keeps counting.
//! The compare register is latched at the counter wrap, so the gate is low
//! from the end of the current period at the latest.

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use fixed::types::U12F4;
use gripdrive_core::traits::PwmOutput;

/// Widest counter period
const MAX_COUNT: u64 = 1 << 16;

/// Largest integer clock divider
const MAX_DIVIDER: u64 = 255;

/// Counter settings for one switching frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmTiming {
    /// Integer clock divider (1-255)
    pub divider: u8,
    /// Counter wrap value
    pub top: u16,
}

impl PwmTiming {
    /// Compute the divider and wrap for `freq_hz` from a `sys_hz` clock
    ///
    /// Frequencies too low for the slowest divider saturate at the
    /// longest period the counter can produce.
    pub fn for_frequency(sys_hz: u32, freq_hz: u32) -> Self {
        let sys = sys_hz as u64;
        let freq = freq_hz.max(1) as u64;

        let divider = sys.div_ceil(freq * MAX_COUNT).clamp(1, MAX_DIVIDER);
        let top = (sys / (divider * freq))
            .saturating_sub(1)
            .min(MAX_COUNT - 1);

        Self {
            divider: divider as u8,
            top: top as u16,
        }
    }

    /// Compare value for an 8-bit duty
    ///
    /// 255 yields `top + 1`, which keeps the output high for the whole period.
    /// With `top` saturated the value is capped at `u16::MAX`, one count short
    /// of fully on.
    pub fn compare(&self, duty: u8) -> u16 {
        (duty as u32 * (self.top as u32 + 1) / 255).min(u16::MAX as u32) as u16
    }
}

/// Motor gate on channel A of a PWM slice
pub struct PwmGate<'d> {
    pwm: Pwm<'d>,
    config: PwmConfig,
    timing: PwmTiming,
    duty: u8,
    attached: bool,
}

impl<'d> PwmGate<'d> {
    /// Configure the slice for `frequency_hz`, starting detached
    pub fn new(mut pwm: Pwm<'d>, frequency_hz: u32) -> Self {
        let timing = PwmTiming::for_frequency(clk_sys_freq(), frequency_hz);

        let mut config = PwmConfig::default();
        config.divider = U12F4::from_num(timing.divider);
        config.top = timing.top;
        config.compare_a = 0;
        pwm.set_config(&config);

        Self {
            pwm,
            config,
            timing,
            duty: 0,
            attached: false,
        }
    }

    /// Active counter settings
    pub fn timing(&self) -> PwmTiming {
        self.timing
    }

    fn apply(&mut self) {
        self.config.compare_a = if self.attached {
            self.timing.compare(self.duty)
        } else {
            0
        };
        self.pwm.set_config(&self.config);
    }
}

impl PwmOutput for PwmGate<'_> {
    fn attach(&mut self) {
        self.attached = true;
        self.apply();
    }

    fn detach(&mut self) {
        self.attached = false;
        self.apply();
    }

    fn write_duty(&mut self, duty: u8) {
        self.duty = duty;
        self.apply();
    }
}
