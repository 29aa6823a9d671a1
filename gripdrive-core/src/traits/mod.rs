//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod indicator;
pub mod input;
pub mod motor;
pub mod sensor;

pub use indicator::{Indicator, Pattern, PixelSink, Rgb};
pub use input::DigitalInput;
pub use motor::{MotorDriver, MotorState, PwmOutput};
pub use sensor::{AnalogInput, Sensor, SensorError};
