//! Trigger/remote authority arbitration
//!
//! The [`MotorIntent`] has two writers: the physical controls and the
//! remote command path. The trigger has unconditional priority:
//!
//! - while the trigger is held the motor is active, whatever the remote
//!   path asked for
//! - releasing the trigger always stops the motor, overriding the remote
//!   path
//! - while the trigger is not held only the remote path changes `active`
//!
//! Step buttons only ever change the speed. A remote stop that arrives
//! while the trigger is held is re-asserted to active on the next tick.

use crate::config::InputConfig;
use crate::scheduler::events::{ControlEvent, EventLog};

use super::debounce::{Debouncer, Edge};

/// Upper bound for the speed setting
pub const MAX_SPEED_PERCENT: u8 = 100;

/// Whether the motor should drive now, and how fast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorIntent {
    /// Requested speed (0-100%), exact value used for the drive duty
    pub speed_percent: u8,
    /// Motor should be driving
    pub active: bool,
}

impl MotorIntent {
    /// PWM duty (0-255) for the requested speed
    pub fn duty(&self) -> u8 {
        (self.speed_percent.min(MAX_SPEED_PERCENT) as u16 * 255 / 100) as u8
    }
}

/// Raw levels of the physical controls for one loop pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlLevels {
    pub trigger: bool,
    pub speed_up: bool,
    pub speed_down: bool,
}

/// Owner of the motor intent
pub struct InputArbiter {
    config: InputConfig,
    intent: MotorIntent,
    trigger_last: bool,
    speed_up: Debouncer,
    speed_down: Debouncer,
}

impl InputArbiter {
    /// Create an arbiter settled on the current control levels
    pub fn new(config: InputConfig, levels: ControlLevels, now_ms: u32) -> Self {
        Self {
            config,
            intent: MotorIntent::default(),
            trigger_last: levels.trigger,
            speed_up: Debouncer::new(config.debounce_ms, levels.speed_up, now_ms),
            speed_down: Debouncer::new(config.debounce_ms, levels.speed_down, now_ms),
        }
    }

    /// Current motor intent
    pub fn intent(&self) -> MotorIntent {
        self.intent
    }

    /// Resolve the physical controls for one loop pass
    ///
    /// The trigger is used as read; step buttons go through their
    /// debouncers.
    pub fn update(&mut self, levels: ControlLevels, now_ms: u32, events: &mut EventLog) {
        let trigger_changed = levels.trigger != self.trigger_last;
        self.trigger_last = levels.trigger;

        if levels.trigger {
            if !self.intent.active {
                self.intent.active = true;
                push(events, ControlEvent::TriggerPressed);
            }
        } else if trigger_changed {
            self.intent.active = false;
            push(events, ControlEvent::TriggerReleased);
        }

        let step = self.config.speed_step;

        if self.speed_up.update(levels.speed_up, now_ms) == Some(Edge::Rising) {
            self.intent.speed_percent = self
                .intent
                .speed_percent
                .saturating_add(step)
                .min(MAX_SPEED_PERCENT);
            push(
                events,
                ControlEvent::SpeedStepped {
                    percent: self.intent.speed_percent,
                },
            );
        }

        if self.speed_down.update(levels.speed_down, now_ms) == Some(Edge::Rising) {
            self.intent.speed_percent = self.intent.speed_percent.saturating_sub(step);
            push(
                events,
                ControlEvent::SpeedStepped {
                    percent: self.intent.speed_percent,
                },
            );
        }
    }

    /// Remote "set speed": exact percentage, clamped to 0-100
    ///
    /// Returns the stored value.
    pub fn set_speed_percent(&mut self, percent: i32) -> u8 {
        self.intent.speed_percent = percent.clamp(0, MAX_SPEED_PERCENT as i32) as u8;
        self.intent.speed_percent
    }

    /// Remote start/stop
    ///
    /// Does not take part in the trigger override: a held trigger
    /// re-asserts `active` on the next update.
    pub fn set_active(&mut self, active: bool) {
        self.intent.active = active;
    }
}

fn push(events: &mut EventLog, event: ControlEvent) {
    // A full log only loses diagnostics, never state
    let _ = events.push(event);
}
