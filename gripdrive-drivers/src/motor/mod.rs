//! Motor driver implementations
//!
//! - [`PwmMotor`]: single PWM gate with a defined idle level

pub mod pwm;

pub use pwm::PwmMotor;
