//! Physical input handling
//!
//! - [`Debouncer`]: sampled shift-register filter for mechanical step buttons
//! - [`InputArbiter`]: owns the [`MotorIntent`] and decides which command
//!   source may change it

pub mod arbiter;
pub mod debounce;

pub use arbiter::{ControlLevels, InputArbiter, MotorIntent, MAX_SPEED_PERCENT};
pub use debounce::{Debouncer, Edge};
