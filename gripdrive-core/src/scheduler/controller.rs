//! Cooperative control loop
//!
//! [`ToolController`] owns every component of the tool and drives them once
//! per call to [`ToolController::poll`]. Nothing in here blocks; all timing
//! is derived from the `now_ms` argument, a wrapping millisecond clock.
//!
//! One pass runs in a fixed order:
//!
//! 1. input arbitration (trigger and step buttons)
//! 2. motor driver applies the resulting intent
//! 3. indicator boot policy and intent push
//! 4. indicator render
//! 5. sensor sampling
//!
//! Remote commands are applied through [`ToolController::apply_remote`]
//! before the pass, on the same thread, so the motor and the indicator
//! always see the same intent.

use crate::config::{IndicatorConfig, ToolConfig};
use crate::input::{ControlLevels, InputArbiter, MotorIntent};
use crate::remote::{RemoteCommand, Telemetry};
use crate::sensor::SampleStatus;
use crate::traits::{DigitalInput, Indicator, MotorDriver, Pattern, Sensor};

use super::events::{ControlEvent, EventLog, SensorKind};

/// The three physical controls of the tool
pub struct Controls<I> {
    pub trigger: I,
    pub speed_up: I,
    pub speed_down: I,
}

impl<I: DigitalInput> Controls<I> {
    fn levels(&mut self) -> ControlLevels {
        ControlLevels {
            trigger: self.trigger.is_active(),
            speed_up: self.speed_up.is_active(),
            speed_down: self.speed_down.is_active(),
        }
    }
}

/// Everything the controller drives, handed over at construction
pub struct ToolParts<B, T, S, M, L, I> {
    pub battery: B,
    pub temperature: T,
    pub tachometer: S,
    pub motor: M,
    pub indicator: L,
    pub controls: Controls<I>,
}

/// The tool's control loop
pub struct ToolController<B, T, S, M, L, I> {
    indicator_config: IndicatorConfig,
    boot_ms: u32,
    speed_display: bool,
    arbiter: InputArbiter,
    controls: Controls<I>,
    battery: B,
    temperature: T,
    tachometer: S,
    motor: M,
    indicator: L,
}

impl<B, T, S, M, L, I> ToolController<B, T, S, M, L, I>
where
    B: Sensor,
    T: Sensor,
    S: Sensor,
    M: MotorDriver,
    L: Indicator,
    I: DigitalInput,
{
    /// Take ownership of the parts and start the boot sequence
    ///
    /// The motor is stopped, the indicator shows the setup pulse and the
    /// step buttons are settled on their current level.
    pub fn new(config: &ToolConfig, parts: ToolParts<B, T, S, M, L, I>, now_ms: u32) -> Self {
        let ToolParts {
            battery,
            temperature,
            tachometer,
            mut motor,
            mut indicator,
            mut controls,
        } = parts;

        motor.stop();
        indicator.set_pattern(Pattern::Pulse {
            color: config.indicator.setup_color,
            period_ms: config.indicator.setup_period_ms,
        });

        let levels = controls.levels();

        Self {
            indicator_config: config.indicator,
            boot_ms: now_ms,
            speed_display: false,
            arbiter: InputArbiter::new(config.input, levels, now_ms),
            controls,
            battery,
            temperature,
            tachometer,
            motor,
            indicator,
        }
    }

    /// Run one pass of the control loop
    pub fn poll(&mut self, now_ms: u32, events: &mut EventLog) {
        let levels = self.controls.levels();
        self.arbiter.update(levels, now_ms, events);

        let intent = self.arbiter.intent();
        self.apply_intent(intent);

        if !self.speed_display
            && now_ms.wrapping_sub(self.boot_ms) >= self.indicator_config.warmup_ms
        {
            self.indicator.set_pattern(Pattern::SpeedDisplay);
            self.speed_display = true;
            push(events, ControlEvent::SpeedDisplayEnabled);
        }
        if self.speed_display {
            self.indicator
                .set_speed_display(intent.speed_percent, intent.active);
        }

        self.indicator.update(now_ms);

        sample(&mut self.battery, SensorKind::Battery, now_ms, events);
        sample(&mut self.temperature, SensorKind::Temperature, now_ms, events);
        sample(&mut self.tachometer, SensorKind::Speed, now_ms, events);
    }

    fn apply_intent(&mut self, intent: MotorIntent) {
        if intent.active {
            self.motor.set_duty(intent.duty());
            self.motor.start();
        } else {
            self.motor.stop();
        }
    }

    /// Apply a command from the remote path
    pub fn apply_remote(&mut self, command: RemoteCommand, events: &mut EventLog) {
        let event = match command {
            RemoteCommand::SetSpeed(percent) => ControlEvent::RemoteSpeed {
                percent: self.set_speed_percent(percent),
            },
            RemoteCommand::SetActive(active) => {
                self.set_motor_active(active);
                ControlEvent::RemoteActive(active)
            }
            RemoteCommand::LegacyDuty(duty) => ControlEvent::LegacyDuty {
                duty: self.set_legacy_duty(duty),
            },
            RemoteCommand::Heartbeat => ControlEvent::Heartbeat,
        };
        push(events, event);
    }

    /// Set the exact speed percentage, clamped to 0-100
    pub fn set_speed_percent(&mut self, percent: i32) -> u8 {
        self.arbiter.set_speed_percent(percent)
    }

    /// Start or stop the motor
    ///
    /// A held trigger re-asserts the motor on the next pass.
    pub fn set_motor_active(&mut self, active: bool) {
        self.arbiter.set_active(active);
    }

    /// Raw duty write from older clients, as one request
    ///
    /// The value is clamped to 0-255. Zero stops the motor; anything else
    /// sets the duty and starts it. The intent follows so the next pass
    /// keeps driving, quantized to whole percent. The percent is rounded
    /// up so a nonzero duty never maps to a stopped 0 %.
    pub fn set_legacy_duty(&mut self, duty: i32) -> u8 {
        let duty = duty.clamp(0, u8::MAX as i32) as u8;

        if duty == 0 {
            self.motor.stop();
            self.arbiter.set_active(false);
        } else {
            self.motor.set_duty(duty);
            self.motor.start();
            self.arbiter
                .set_speed_percent(((duty as u32 * 100 + 254) / 255) as i32);
            self.arbiter.set_active(true);
        }

        duty
    }

    /// Current motor intent
    pub fn intent(&self) -> MotorIntent {
        self.arbiter.intent()
    }

    /// Calibrated battery voltage (V)
    pub fn battery_volts(&self) -> f32 {
        self.battery.reading().value
    }

    /// Battery voltage before calibration (V)
    pub fn battery_raw_volts(&self) -> f32 {
        self.battery.reading().raw
    }

    /// Motor temperature (°C)
    pub fn temperature_c(&self) -> f32 {
        self.temperature.reading().value
    }

    /// Shaft speed (rev/min)
    pub fn rpm(&self) -> f32 {
        self.tachometer.reading().value
    }

    /// Requested speed (0-100%)
    pub fn speed_percent(&self) -> u8 {
        self.arbiter.intent().speed_percent
    }

    /// Check if the motor is supposed to be driving
    pub fn is_motor_active(&self) -> bool {
        self.arbiter.intent().active
    }

    /// Check if warm-up is over and the indicator shows the speed
    pub fn is_speed_display_enabled(&self) -> bool {
        self.speed_display
    }

    /// Snapshot of all telemetry values
    pub fn telemetry(&self) -> Telemetry {
        let battery = self.battery.reading();
        let temperature = self.temperature.reading();
        let speed = self.tachometer.reading();
        let intent = self.arbiter.intent();

        Telemetry {
            battery_volts: battery.value,
            battery_raw_volts: battery.raw,
            battery_ready: battery.ready,
            temperature_c: temperature.value,
            temperature_ready: temperature.ready,
            rpm: speed.value,
            rpm_ready: speed.ready,
            speed_percent: intent.speed_percent,
            motor_active: intent.active,
        }
    }

    pub fn battery(&self) -> &B {
        &self.battery
    }

    pub fn temperature(&self) -> &T {
        &self.temperature
    }

    pub fn tachometer(&self) -> &S {
        &self.tachometer
    }

    pub fn motor(&self) -> &M {
        &self.motor
    }

    pub fn indicator(&self) -> &L {
        &self.indicator
    }
}

fn sample<S: Sensor>(sensor: &mut S, kind: SensorKind, now_ms: u32, events: &mut EventLog) {
    if let SampleStatus::Failed(error) = sensor.update(now_ms) {
        push(
            events,
            ControlEvent::SensorFault {
                sensor: kind,
                error,
            },
        );
    }
}

fn push(events: &mut EventLog, event: ControlEvent) {
    let _ = events.push(event);
}
