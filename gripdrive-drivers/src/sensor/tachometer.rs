//! Motor tachometer
//!
//! The motor's FG output produces a fixed number of pulses per shaft
//! revolution. An edge interrupt calls [`PulseCounter::record`] for every
//! pulse; the [`Tachometer`] sampler periodically takes the count and turns
//! it into a rate using the actual time since the previous window.
//!
//! The counter is the only state shared with interrupt context. Both
//! operations run inside a critical section of a few instructions, so a
//! pulse can never be lost between the snapshot and the reset.

use core::cell::Cell;

use critical_section::Mutex;
use gripdrive_core::config::TachometerConfig;
use gripdrive_core::sensor::{SampleGate, SampleStatus, SensorReading};
use gripdrive_core::traits::Sensor;

/// Pulse counter shared between an interrupt handler and the control loop
pub struct PulseCounter {
    count: Mutex<Cell<u32>>,
}

impl PulseCounter {
    /// Create a zeroed counter, usable in a `static`
    pub const fn new() -> Self {
        Self {
            count: Mutex::new(Cell::new(0)),
        }
    }

    /// Count one pulse (interrupt side)
    pub fn record(&self) {
        critical_section::with(|cs| {
            let count = self.count.borrow(cs);
            count.set(count.get().wrapping_add(1));
        });
    }

    /// Snapshot the count and reset it to zero (loop side)
    pub fn take(&self) -> u32 {
        critical_section::with(|cs| self.count.borrow(cs).replace(0))
    }
}

impl Default for PulseCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Shaft speed sampler
///
/// The reading's raw value is the pulse rate (pulses per second), its
/// value the shaft speed in rev/min.
pub struct Tachometer<'a> {
    counter: &'a PulseCounter,
    pulses_per_rev: u8,
    gate: SampleGate,
    reading: SensorReading,
}

impl<'a> Tachometer<'a> {
    /// Create a sampler reading from `counter`
    ///
    /// Pulses recorded before this call are discarded.
    pub fn new(counter: &'a PulseCounter, config: &TachometerConfig, now_ms: u32) -> Self {
        counter.take();
        Self {
            counter,
            pulses_per_rev: config.pulses_per_rev.max(1),
            gate: SampleGate::new(config.update_interval_ms, now_ms),
            reading: SensorReading::new(),
        }
    }

    /// Last shaft speed (rev/min)
    pub fn rpm(&self) -> f32 {
        self.reading.value
    }

    /// Last pulse rate (pulses per second)
    pub fn pulse_rate(&self) -> f32 {
        self.reading.raw
    }
}

impl Sensor for Tachometer<'_> {
    fn update(&mut self, now_ms: u32) -> SampleStatus {
        let Some(elapsed_ms) = self.gate.poll(now_ms) else {
            return SampleStatus::Idle;
        };

        let pulses = self.counter.take();
        let rate = pulses as f32 * 1000.0 / elapsed_ms.max(1) as f32;
        let rpm = rate * 60.0 / self.pulses_per_rev as f32;
        self.reading.publish(rate, rpm, now_ms);

        SampleStatus::Sampled
    }

    fn reading(&self) -> SensorReading {
        self.reading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    extern crate std;

    fn config(pulses_per_rev: u8) -> TachometerConfig {
        TachometerConfig {
            pulses_per_rev,
            ..TachometerConfig::default()
        }
    }

    #[test]
    fn test_pulses_over_one_second() {
        let counter = PulseCounter::new();
        let mut tach = Tachometer::new(&counter, &config(1), 0);

        for _ in 0..25 {
            counter.record();
        }

        // Exactly 1000 ms since the previous window
        assert_eq!(tach.update(1000), SampleStatus::Sampled);
        assert!((tach.rpm() - 25.0 * 60.0).abs() < 1e-3);
        assert!((tach.pulse_rate() - 25.0).abs() < 1e-3);
        assert!(tach.is_ready());
    }

    #[test]
    fn test_uses_actual_elapsed_time() {
        let counter = PulseCounter::new();
        let mut tach = Tachometer::new(&counter, &config(1), 0);

        assert_eq!(tach.update(199), SampleStatus::Idle);

        for _ in 0..10 {
            counter.record();
        }
        // A late window: 10 pulses over 250 ms is 40 pulses/s
        tach.update(250);
        assert!((tach.pulse_rate() - 40.0).abs() < 1e-3);
        assert!((tach.rpm() - 2400.0).abs() < 1e-2);
    }

    #[test]
    fn test_pulses_per_revolution() {
        let counter = PulseCounter::new();
        let mut tach = Tachometer::new(&counter, &config(4), 0);

        for _ in 0..40 {
            counter.record();
        }
        tach.update(1000);
        assert!((tach.rpm() - 600.0).abs() < 1e-3);
    }

    #[test]
    fn test_counter_reset_after_window() {
        let counter = PulseCounter::new();
        let mut tach = Tachometer::new(&counter, &config(1), 0);

        counter.record();
        tach.update(200);
        assert_eq!(counter.take(), 0);

        tach.update(400);
        assert_eq!(tach.rpm(), 0.0);
        assert!(tach.is_ready());
    }

    #[test]
    fn test_stale_pulses_discarded_on_new() {
        let counter = PulseCounter::new();
        counter.record();
        counter.record();

        let mut tach = Tachometer::new(&counter, &config(1), 0);
        tach.update(1000);
        assert_eq!(tach.rpm(), 0.0);
    }

    #[test]
    fn test_no_pulse_lost_under_contention() {
        use std::sync::Arc;
        use std::thread;

        let counter = Arc::new(PulseCounter::new());
        let writer = {
            let counter = Arc::clone(&counter);
            thread::spawn(move || {
                for _ in 0..100_000 {
                    counter.record();
                }
            })
        };

        let mut total: u64 = 0;
        while !writer.is_finished() {
            total += counter.take() as u64;
        }
        writer.join().unwrap();
        total += counter.take() as u64;

        assert_eq!(total, 100_000);
    }
}
