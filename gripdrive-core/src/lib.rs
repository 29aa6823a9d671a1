//! Board-agnostic core logic for the hand tool firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (analog input, buttons, PWM, pixels)
//! - Configuration types and two-point calibration math
//! - Sensor readings and sampling time gates
//! - Input debouncing and trigger/remote authority arbitration
//! - Remote command and telemetry boundary
//! - The cooperative control loop that composes everything

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod input;
pub mod remote;
pub mod scheduler;
pub mod sensor;
pub mod traits;
