//! Pixel strip indicator
//!
//! Renders the active [`Pattern`] into a frame and hands it to a
//! [`PixelSink`]. Every pattern has its own update interval:
//!
//! | Pattern        | Interval                       |
//! |----------------|--------------------------------|
//! | `Off`/`Static` | configured default period      |
//! | `Blink`        | the blink period (one toggle)  |
//! | `Pulse`        | animation refresh (10 ms)      |
//! | `SpeedDisplay` | animation refresh (10 ms)      |
//!
//! Switching pattern resets the blink toggle and pulse phase and renders
//! on the next update regardless of the interval. The global brightness is
//! applied to every frame just before it is shown.

use gripdrive_core::config::{IndicatorConfig, MAX_LEDS};
use gripdrive_core::traits::{Indicator, Pattern, PixelSink, Rgb};

use super::waveform::{lit_count, pulse_level};

/// Indicator on an addressable pixel strip
pub struct PixelIndicator<S> {
    sink: S,
    config: IndicatorConfig,
    led_count: usize,
    pattern: Pattern,
    frame: [Rgb; MAX_LEDS],
    /// Start of the current animation cycle, set on the first render
    phase_start_ms: Option<u32>,
    last_render_ms: u32,
    force_render: bool,
    blink_on: bool,
    speed_percent: u8,
    motor_active: bool,
}

impl<S: PixelSink> PixelIndicator<S> {
    /// Create an indicator showing [`Pattern::Off`]
    pub fn new(sink: S, config: &IndicatorConfig) -> Self {
        Self {
            sink,
            config: *config,
            led_count: (config.led_count as usize).clamp(1, MAX_LEDS),
            pattern: Pattern::Off,
            frame: [Rgb::BLACK; MAX_LEDS],
            phase_start_ms: None,
            last_render_ms: 0,
            force_render: true,
            blink_on: false,
            speed_percent: 0,
            motor_active: false,
        }
    }

    /// Last rendered frame, before brightness scaling
    pub fn frame(&self) -> &[Rgb] {
        &self.frame[..self.led_count]
    }

    /// Get the pixel sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Number of pixels on the strip
    pub fn led_count(&self) -> usize {
        self.led_count
    }

    /// Change the color of the active pattern
    ///
    /// Applies to `Static`, `Blink` and `Pulse`; the speed display keeps
    /// its configured colors. Timing is not reset.
    pub fn set_color(&mut self, color: Rgb) {
        self.pattern = match self.pattern {
            Pattern::Static(_) => Pattern::Static(color),
            Pattern::Blink { period_ms, .. } => Pattern::Blink { color, period_ms },
            Pattern::Pulse { period_ms, .. } => Pattern::Pulse { color, period_ms },
            other => other,
        };
        self.force_render = true;
    }

    /// Change the period used by `Off`, `Static` and new patterns
    ///
    /// A running `Blink` picks up the new period as well.
    pub fn set_period(&mut self, period_ms: u16) {
        let period_ms = period_ms.max(1);
        self.config.default_period_ms = period_ms;
        if let Pattern::Blink { color, .. } = self.pattern {
            self.pattern = Pattern::Blink { color, period_ms };
        }
    }

    fn interval_ms(&self) -> u32 {
        match self.pattern {
            Pattern::Off | Pattern::Static(_) => self.config.default_period_ms as u32,
            Pattern::Blink { period_ms, .. } => period_ms as u32,
            Pattern::Pulse { .. } | Pattern::SpeedDisplay => {
                self.config.animation_refresh_ms as u32
            }
        }
    }

    fn fill(&mut self, color: Rgb) {
        self.frame[..self.led_count].fill(color);
    }

    fn render(&mut self, elapsed_ms: u32) {
        match self.pattern {
            Pattern::Off => self.fill(Rgb::BLACK),
            Pattern::Static(color) => self.fill(color),
            Pattern::Blink { color, .. } => {
                self.blink_on = !self.blink_on;
                self.fill(if self.blink_on { color } else { Rgb::BLACK });
            }
            Pattern::Pulse { color, period_ms } => {
                self.fill(color.scaled(pulse_level(elapsed_ms, period_ms)));
            }
            Pattern::SpeedDisplay => self.render_speed(elapsed_ms),
        }
    }

    /// Bar graph lit from the far end of the strip
    fn render_speed(&mut self, elapsed_ms: u32) {
        let color = if self.motor_active {
            self.config.active_color
        } else {
            self.config.idle_color
        };
        let n = self.led_count;

        self.fill(Rgb::BLACK);

        if self.speed_percent == 0 {
            let level = pulse_level(elapsed_ms, self.config.idle_pulse_period_ms);
            self.frame[n - 1] = color.scaled(level);
            return;
        }

        let lit = lit_count(self.speed_percent, n);
        self.frame[n - lit..n].fill(color);
    }

    fn show(&mut self) {
        let brightness = self.config.brightness;
        let mut out = [Rgb::BLACK; MAX_LEDS];
        for (dst, src) in out.iter_mut().zip(&self.frame[..self.led_count]) {
            *dst = src.scaled(brightness);
        }
        self.sink.show(&out[..self.led_count]);
    }
}

impl<S: PixelSink> Indicator for PixelIndicator<S> {
    fn set_pattern(&mut self, pattern: Pattern) {
        self.pattern = pattern;
        self.phase_start_ms = None;
        self.blink_on = false;
        self.force_render = true;
    }

    fn pattern(&self) -> Pattern {
        self.pattern
    }

    fn set_speed_display(&mut self, percent: u8, active: bool) {
        self.speed_percent = percent.min(100);
        self.motor_active = active;
    }

    fn update(&mut self, now_ms: u32) -> bool {
        if !self.force_render && now_ms.wrapping_sub(self.last_render_ms) < self.interval_ms() {
            return false;
        }

        let start = *self.phase_start_ms.get_or_insert(now_ms);
        self.force_render = false;
        self.last_render_ms = now_ms;

        self.render(now_ms.wrapping_sub(start));
        self.show();
        true
    }
}
