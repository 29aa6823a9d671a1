//! Brightness curve and speed bar math

use micromath::F32Ext;

use core::f32::consts::PI;

/// Sine pulse brightness (0-255) at `elapsed_ms` into a `period_ms` cycle
///
/// Starts dark, peaks at half period:
/// `(sin(2π·(t mod P)/P − π/2) + 1) / 2`.
pub fn pulse_level(elapsed_ms: u32, period_ms: u16) -> u8 {
    let period = period_ms.max(1) as u32;
    let phase = (elapsed_ms % period) as f32 / period as f32;
    let wave = ((2.0 * PI * phase - PI / 2.0).sin() + 1.0) / 2.0;
    (wave * 255.0 + 0.5).clamp(0.0, 255.0) as u8
}

/// Speed rounded to the 20% display step, capped at 100
pub fn display_step(percent: u8) -> u8 {
    (((percent as u16 + 10) / 20) * 20).min(100) as u8
}

/// Number of lit pixels for a speed on a strip of `led_count`
///
/// The display step is scaled across the whole strip, so 100% lights every
/// pixel. A nonzero speed always lights at least one pixel.
pub fn lit_count(percent: u8, led_count: usize) -> usize {
    if percent == 0 {
        return 0;
    }
    (display_step(percent) as usize * led_count / 100)
        .max(1)
        .min(led_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_shape() {
        assert!(pulse_level(0, 2000) <= 1);
        assert!(pulse_level(1000, 2000) >= 254);
        assert!(pulse_level(2000, 2000) <= 1);

        let quarter = pulse_level(500, 2000);
        assert!((120..=135).contains(&quarter), "got {}", quarter);
    }

    #[test]
    fn test_pulse_rises_then_falls() {
        let mut previous = pulse_level(0, 1000);
        for t in (50..=500).step_by(50) {
            let level = pulse_level(t, 1000);
            assert!(level >= previous);
            previous = level;
        }
        for t in (550..1000).step_by(50) {
            let level = pulse_level(t, 1000);
            assert!(level <= previous);
            previous = level;
        }
    }

    #[test]
    fn test_display_step_rounding() {
        assert_eq!(display_step(0), 0);
        assert_eq!(display_step(9), 0);
        assert_eq!(display_step(10), 20);
        assert_eq!(display_step(29), 20);
        assert_eq!(display_step(30), 40);
        assert_eq!(display_step(89), 80);
        assert_eq!(display_step(90), 100);
        assert_eq!(display_step(100), 100);
        assert_eq!(display_step(255), 100);
    }

    #[test]
    fn test_lit_count() {
        assert_eq!(lit_count(0, 5), 0);
        for percent in 1..=20 {
            assert_eq!(lit_count(percent, 5), 1, "percent {}", percent);
        }
        assert_eq!(lit_count(40, 5), 2);
        assert_eq!(lit_count(81, 5), 4);
        assert_eq!(lit_count(89, 5), 4);
        for percent in 90..=100 {
            assert_eq!(lit_count(percent, 5), 5, "percent {}", percent);
        }
    }

    #[test]
    fn test_full_speed_lights_whole_strip() {
        for led_count in 1..=16 {
            assert_eq!(lit_count(100, led_count), led_count, "{} leds", led_count);
        }
    }

    #[test]
    fn test_lit_count_scales_with_strip() {
        assert_eq!(lit_count(40, 8), 3);
        assert_eq!(lit_count(60, 8), 4);
        assert_eq!(lit_count(80, 16), 12);
        assert_eq!(lit_count(20, 16), 3);

        // Short strips still light one pixel for any nonzero speed
        assert_eq!(lit_count(20, 3), 1);
        assert_eq!(lit_count(1, 16), 1);
        assert_eq!(lit_count(0, 16), 0);
    }
}
