//! RP2040 adapters for the GripDrive firmware
//!
//! Implements the hardware seams of `gripdrive-core` on top of `embassy-rp`:
//!
//! - ADC channels sharing one blocking converter
//! - PWM slice driving the motor gate
//! - PIO-driven WS2812 pixel strip

#![no_std]

pub mod adc;
pub mod pwm;
pub mod ws2812;

pub use adc::AdcInput;
pub use pwm::{PwmGate, PwmTiming};
pub use ws2812::Ws2812;
