//! Sensor readings and sampling time gates
//!
//! Every sampler owns one [`SensorReading`] and one [`SampleGate`]. The gate
//! compares the loop clock against the time of the previous sample and lets
//! the sampler work at most once per interval; a late tick simply samples
//! late.

use crate::traits::SensorError;

/// Last published value of one physical quantity
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorReading {
    /// Value before calibration/linearization
    pub raw: f32,
    /// Value in engineering units
    pub value: f32,
    /// Set after the first completed sample window, never cleared
    pub ready: bool,
    /// Loop time of the last completed sample (ms)
    pub last_sample_ms: u32,
}

impl SensorReading {
    /// A reading that has never been sampled
    pub const fn new() -> Self {
        Self {
            raw: 0.0,
            value: 0.0,
            ready: false,
            last_sample_ms: 0,
        }
    }

    /// Publish a completed sample
    pub fn publish(&mut self, raw: f32, value: f32, now_ms: u32) {
        self.raw = raw;
        self.value = value;
        self.ready = true;
        self.last_sample_ms = now_ms;
    }
}

/// Outcome of one sampler update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleStatus {
    /// Interval not elapsed, nothing done
    Idle,
    /// A new value was published
    Sampled,
    /// The window was due but a read failed; the reading is unchanged
    Failed(SensorError),
}

/// Non-blocking interval gate on a wrapping millisecond clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SampleGate {
    interval_ms: u32,
    last_ms: u32,
}

impl SampleGate {
    /// Create a gate whose first window ends one interval after `now_ms`
    pub const fn new(interval_ms: u32, now_ms: u32) -> Self {
        Self {
            interval_ms,
            last_ms: now_ms,
        }
    }

    /// Check the gate
    ///
    /// Returns the actual elapsed time since the previous window if the
    /// interval has passed, and restarts the window at `now_ms`.
    pub fn poll(&mut self, now_ms: u32) -> Option<u32> {
        let elapsed = now_ms.wrapping_sub(self.last_ms);
        if elapsed < self.interval_ms {
            return None;
        }
        self.last_ms = now_ms;
        Some(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_waits_for_interval() {
        let mut gate = SampleGate::new(250, 0);
        assert_eq!(gate.poll(0), None);
        assert_eq!(gate.poll(249), None);
        assert_eq!(gate.poll(250), Some(250));
        assert_eq!(gate.poll(300), None);
        assert_eq!(gate.poll(510), Some(260));
    }

    #[test]
    fn test_gate_reports_late_ticks() {
        let mut gate = SampleGate::new(200, 1000);
        assert_eq!(gate.poll(1237), Some(237));
    }

    #[test]
    fn test_gate_survives_clock_wrap() {
        let mut gate = SampleGate::new(250, u32::MAX - 100);
        assert_eq!(gate.poll(100), None);
        assert_eq!(gate.poll(149), Some(250));
    }

    #[test]
    fn test_reading_ready_latches() {
        let mut reading = SensorReading::new();
        assert!(!reading.ready);

        reading.publish(11.6, 12.0, 250);
        assert!(reading.ready);
        assert_eq!(reading.last_sample_ms, 250);
        assert_eq!(reading.value, 12.0);
        assert_eq!(reading.raw, 11.6);
    }
}
