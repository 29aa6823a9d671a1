//! Control task
//!
//! Runs the cooperative control loop every millisecond: remote commands
//! first, then one `ToolController` pass, then the power stage enable line.
//! Events raised during the pass are logged here since the core never logs.

use defmt::*;
use embassy_rp::gpio::{Input, Level, Output};
use embassy_rp::peripherals::PIO0;
use embassy_time::{Duration, Ticker};

use gripdrive_core::config::ToolConfig;
use gripdrive_core::scheduler::{ControlEvent, EventLog, ToolController, ToolParts};
use gripdrive_drivers::indicator::PixelIndicator;
use gripdrive_drivers::input::ActiveLow;
use gripdrive_drivers::motor::PwmMotor;
use gripdrive_drivers::sensor::{BatteryMonitor, NtcThermistor, Tachometer};
use gripdrive_hal_rp2040::{AdcInput, PwmGate, Ws2812};

use super::now_ms;
use crate::channels::{REMOTE_COMMANDS, TELEMETRY};

/// Control loop period (ms)
const CONTROL_PERIOD_MS: u64 = 1;

/// Board peripherals handed to the controller
pub type ToolHardware = ToolParts<
    BatteryMonitor<AdcInput<'static>>,
    NtcThermistor<AdcInput<'static>>,
    Tachometer<'static>,
    PwmMotor<PwmGate<'static>>,
    PixelIndicator<Ws2812<'static, PIO0, 0>>,
    ActiveLow<Input<'static>>,
>;

/// Control loop task
///
/// `motor_enable` switches the MOSFET that powers the motor stage. It
/// follows the motor intent on every pass, together with the PWM drive.
#[embassy_executor::task]
pub async fn control_task(
    config: ToolConfig,
    hardware: ToolHardware,
    mut motor_enable: Output<'static>,
) {
    info!("Control task started");

    let mut controller = ToolController::new(&config, hardware, now_ms());
    let mut ticker = Ticker::every(Duration::from_millis(CONTROL_PERIOD_MS));

    loop {
        let mut events = EventLog::new();

        while let Ok(command) = REMOTE_COMMANDS.try_receive() {
            debug!("Remote command: {:?}", command);
            controller.apply_remote(command, &mut events);
        }

        controller.poll(now_ms(), &mut events);

        let level = if controller.intent().active {
            Level::High
        } else {
            Level::Low
        };
        motor_enable.set_level(level);

        for event in &events {
            log_event(event);
        }

        TELEMETRY.signal(controller.telemetry());

        ticker.next().await;
    }
}

fn log_event(event: &ControlEvent) {
    match *event {
        ControlEvent::TriggerPressed => info!("Trigger pressed, motor forced on"),
        ControlEvent::TriggerReleased => info!("Trigger released, motor forced off"),
        ControlEvent::SpeedStepped { percent } => debug!("Speed stepped to {}%", percent),
        ControlEvent::RemoteSpeed { percent } => debug!("Remote speed {}%", percent),
        ControlEvent::RemoteActive(active) => debug!("Remote motor active={}", active),
        ControlEvent::LegacyDuty { duty } => debug!("Remote legacy duty {}", duty),
        ControlEvent::Heartbeat => trace!("Remote heartbeat"),
        ControlEvent::SpeedDisplayEnabled => info!("Warm-up complete, showing speed"),
        ControlEvent::SensorFault { sensor, error } => {
            warn!("{:?} sample failed: {:?}", sensor, error)
        }
    }
}
