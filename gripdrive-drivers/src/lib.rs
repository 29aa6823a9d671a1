//! Device drivers
//!
//! This crate provides concrete implementations of the traits defined
//! in gripdrive-core for the components of the tool:
//!
//! - Sensors (battery divider, NTC thermistor, tachometer)
//! - Motor drive (PWM with attach/detach)
//! - Indicator (addressable pixel strip)
//! - Buttons (active-low inputs)

#![no_std]
#![deny(unsafe_code)]

pub mod indicator;
pub mod input;
pub mod motor;
pub mod sensor;
