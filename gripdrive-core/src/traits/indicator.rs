//! Indicator light traits
//!
//! The indicator is a short strip of addressable RGB pixels. Patterns are
//! a tagged variant carrying their own color and timing; the driver renders
//! the active one through a single update step.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// All channels off
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    /// Create a color from its channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale every channel by `level / 255`
    pub const fn scaled(self, level: u8) -> Self {
        Self {
            r: ((self.r as u16 * level as u16) / 255) as u8,
            g: ((self.g as u16 * level as u16) / 255) as u8,
            b: ((self.b as u16 * level as u16) / 255) as u8,
        }
    }
}

/// Indicator pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pattern {
    /// All pixels off
    #[default]
    Off,
    /// All pixels at a flat color
    Static(Rgb),
    /// All pixels toggle between `color` and off every `period_ms`
    Blink { color: Rgb, period_ms: u16 },
    /// All pixels follow a sine brightness wave with period `period_ms`
    Pulse { color: Rgb, period_ms: u16 },
    /// Motor speed as a bar graph, see [`Indicator::set_speed_display`]
    SpeedDisplay,
}

/// Output stage for a frame of pixels
pub trait PixelSink {
    /// Latch a complete frame onto the strip
    fn show(&mut self, frame: &[Rgb]);
}

/// Indicator light state machine
pub trait Indicator {
    /// Switch to a new pattern
    ///
    /// Resets animation phase and forces a render on the next update.
    fn set_pattern(&mut self, pattern: Pattern);

    /// Get the active pattern
    fn pattern(&self) -> Pattern;

    /// Feed the speed display with the current motor intent
    ///
    /// Only the displayed values change; the active pattern is untouched.
    fn set_speed_display(&mut self, percent: u8, active: bool);

    /// Render the active pattern if its update interval has elapsed
    ///
    /// Returns true if a frame was pushed to the strip.
    fn update(&mut self, now_ms: u32) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled() {
        let color = Rgb::new(255, 128, 0);
        assert_eq!(color.scaled(255), color);
        assert_eq!(color.scaled(0), Rgb::BLACK);
        assert_eq!(color.scaled(128), Rgb::new(128, 64, 0));
    }
}
