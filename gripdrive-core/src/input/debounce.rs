//! Step-button debouncing
//!
//! Buttons are sampled on a fixed cadence and fed to a `debouncr` shift
//! register. The debounced level only changes once the last ten
//! samples agree, so the settle window is the sample
//! cadence times the sample count. A contact that chatters faster than
//! the window never produces an edge.

use debouncr::{debounce_stateful_10, DebouncerStateful, Repeat10};

use crate::sensor::SampleGate;

pub use debouncr::Edge;

/// Consecutive equal samples needed to accept a level
const DEBOUNCE_SAMPLES: u32 = 10;

/// Sample cadence giving a `settle_ms` window (at least 1 ms)
const fn sample_interval_ms(settle_ms: u32) -> u32 {
    let interval = settle_ms / DEBOUNCE_SAMPLES;
    if interval == 0 {
        1
    } else {
        interval
    }
}

/// Debounce state for one step button
pub struct Debouncer {
    gate: SampleGate,
    state: DebouncerStateful<u16, Repeat10>,
}

impl Debouncer {
    /// Create a debouncer that starts settled at `initial`
    pub fn new(settle_ms: u32, initial: bool, now_ms: u32) -> Self {
        Self {
            gate: SampleGate::new(sample_interval_ms(settle_ms), now_ms),
            state: debounce_stateful_10(initial),
        }
    }

    /// Feed the current reading
    ///
    /// Readings between sample points are skipped. Returns the edge if the
    /// debounced level changed on this call.
    pub fn update(&mut self, reading: bool, now_ms: u32) -> Option<Edge> {
        self.gate.poll(now_ms)?;
        self.state.update(reading)
    }

    /// Debounced level
    pub fn is_pressed(&self) -> bool {
        self.state.is_high()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed `levels` every millisecond and return the times of rising edges
    fn rising_edges(
        debouncer: &mut Debouncer,
        levels: impl Fn(u32) -> bool,
        until_ms: u32,
    ) -> std::vec::Vec<u32> {
        (0..=until_ms)
            .filter(|&t| debouncer.update(levels(t), t) == Some(Edge::Rising))
            .collect()
    }

    extern crate std;

    #[test]
    fn test_sample_interval() {
        assert_eq!(sample_interval_ms(50), 5);
        assert_eq!(sample_interval_ms(5), 1);
        assert_eq!(sample_interval_ms(0), 1);
    }

    #[test]
    fn test_chatter_faster_than_window_is_ignored() {
        let mut debouncer = Debouncer::new(50, false, 0);

        // Toggles every 30ms for half a second
        let edges = rising_edges(&mut debouncer, |t| (t / 30) % 2 == 1, 500);

        assert!(edges.is_empty());
        assert!(!debouncer.is_pressed());
    }

    #[test]
    fn test_stable_press_registers_once() {
        let mut debouncer = Debouncer::new(50, false, 0);

        // Pressed from 100ms to 400ms
        let edges = rising_edges(&mut debouncer, |t| (100..400).contains(&t), 600);

        assert_eq!(edges.len(), 1);
        assert!(!debouncer.is_pressed());
    }

    #[test]
    fn test_edge_fires_after_settle_window() {
        let mut debouncer = Debouncer::new(50, false, 0);

        let edges = rising_edges(&mut debouncer, |t| t >= 100, 200);

        // Ten samples 5ms apart, the first one taken at the press
        assert_eq!(edges, [145]);
        assert!(debouncer.is_pressed());
    }

    #[test]
    fn test_release_registers_falling_edge() {
        let mut debouncer = Debouncer::new(50, true, 0);
        assert!(debouncer.is_pressed());

        let falling = (0..=200)
            .filter(|&t| debouncer.update(t < 100, t) == Some(Edge::Falling))
            .count();

        assert_eq!(falling, 1);
        assert!(!debouncer.is_pressed());
    }

    #[test]
    fn test_bounce_restarts_window() {
        let mut debouncer = Debouncer::new(50, false, 0);

        // Pressed from 100ms with a 10ms dropout at 120ms
        let edges = rising_edges(
            &mut debouncer,
            |t| t >= 100 && !(120..130).contains(&t),
            300,
        );

        assert_eq!(edges, [175]);
    }

    #[test]
    fn test_each_transition_registers_once() {
        let mut debouncer = Debouncer::new(50, false, 0);

        // Three clean presses of 100ms separated by 100ms
        let edges = rising_edges(&mut debouncer, |t| (t / 100) % 2 == 1 && t < 600, 800);

        assert_eq!(edges.len(), 3);
    }

    #[test]
    fn test_held_at_start_gives_no_edge() {
        let mut debouncer = Debouncer::new(50, true, 0);

        let edges = rising_edges(&mut debouncer, |_| true, 300);

        assert!(edges.is_empty());
        assert!(debouncer.is_pressed());
    }
}
