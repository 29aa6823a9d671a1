//! Indicator implementations
//!
//! - [`PixelIndicator`]: pattern state machine over an addressable strip
//! - [`waveform`]: brightness curve and speed bar math shared by patterns

pub mod pixel;
pub mod waveform;

pub use pixel::PixelIndicator;
