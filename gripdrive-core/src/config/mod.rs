//! Configuration types
//!
//! Board-agnostic configuration structures. The firmware fills these in at
//! build time from its TOML description; everything here has a device
//! default so tests and bring-up can run without any file at all.

pub mod calibration;
pub mod types;

pub use calibration::*;
pub use types::*;
