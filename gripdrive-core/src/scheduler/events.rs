//! Notable happenings of one control loop pass
//!
//! The controller never logs by itself. Everything worth reporting is
//! pushed into an [`EventLog`] that the caller drains after each pass.

use heapless::Vec;

use crate::traits::SensorError;

/// Capacity of the per-pass event log
pub const MAX_EVENTS: usize = 16;

/// Fixed-capacity event log filled by one control pass
pub type EventLog = Vec<ControlEvent, MAX_EVENTS>;

/// Which sampler a sensor event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorKind {
    Battery,
    Temperature,
    Speed,
}

/// Events produced by the control loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlEvent {
    // Physical controls
    /// Trigger took over and forced the motor on
    TriggerPressed,
    /// Trigger was released and forced the motor off
    TriggerReleased,
    /// A step button changed the speed setting
    SpeedStepped { percent: u8 },

    // Remote path
    /// Remote set the speed (value after clamping)
    RemoteSpeed { percent: u8 },
    /// Remote started or stopped the motor
    RemoteActive(bool),
    /// Remote wrote a raw duty (value after clamping)
    LegacyDuty { duty: u8 },
    /// Remote liveness ping
    Heartbeat,

    // Lifecycle
    /// Warm-up finished and the indicator now shows the speed
    SpeedDisplayEnabled,

    // Sensors
    /// A sample window was abandoned because a read failed
    SensorFault {
        sensor: SensorKind,
        error: SensorError,
    },
}
