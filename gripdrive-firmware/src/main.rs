//! GripDrive - Motorized Hand Tool Firmware
//!
//! Main firmware binary for RP2040-based battery-powered tools. One
//! cooperative control task owns every peripheral; the tachometer edge
//! counter runs on a higher-priority executor and shares only a pulse
//! counter with it.

#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::adc::{Adc, Blocking, Channel, Config as AdcConfig};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio::{Common, InterruptHandler as PioInterruptHandler, Pio};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use gripdrive_core::config::LinearCalibration;
use gripdrive_core::scheduler::Controls;
use gripdrive_drivers::indicator::PixelIndicator;
use gripdrive_drivers::input::ActiveLow;
use gripdrive_drivers::motor::PwmMotor;
use gripdrive_drivers::sensor::{BatteryMonitor, NtcThermistor, PulseCounter, Tachometer};
use gripdrive_hal_rp2040::{AdcInput, PwmGate, Ws2812};

use crate::tasks::{now_ms, ToolHardware};

mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

/// Executor for the tachometer edge task, preempting the control loop
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

/// FG pulses shared between the edge task and the control loop
static PULSES: PulseCounter = PulseCounter::new();

// The converter is shared by the battery and thermistor channels
static ADC: StaticCell<RefCell<Adc<'static, Blocking>>> = StaticCell::new();

// PIO0 shared resources, kept alive alongside the strip's state machine
static PIO_COMMON: StaticCell<Common<'static, PIO0>> = StaticCell::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("GripDrive firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let tool = config::TOOL_CONFIG;

    // Motor stage MOSFET, off until the control loop asks for the motor
    // Pin assignments are board-specific
    let motor_enable = Output::new(p.PIN_7, Level::Low);

    let pwm = Pwm::new_output_a(p.PWM_SLICE4, p.PIN_8, PwmConfig::default());
    let motor = PwmMotor::new(PwmGate::new(pwm, tool.motor.pwm_frequency_hz));
    info!("Motor PWM at {} Hz", tool.motor.pwm_frequency_hz);

    // Tachometer edges are counted at interrupt priority
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    let fg = Input::new(p.PIN_16, Pull::None);
    unwrap!(high_spawner.spawn(tasks::tachometer_task(fg, &PULSES)));

    // Analog front-ends
    let adc: &'static RefCell<_> =
        ADC.init(RefCell::new(Adc::new_blocking(p.ADC, AdcConfig::default())));
    let battery_input = AdcInput::new(adc, Channel::new_pin(p.PIN_26, Pull::None));
    let therm_input = AdcInput::new(adc, Channel::new_pin(p.PIN_27, Pull::None));

    let battery_config = &tool.battery;
    let calibration = LinearCalibration::from_points(
        battery_config.cal_low,
        battery_config.cal_high,
        battery_config.min_volts,
        battery_config.max_volts,
    )
    .unwrap_or_else(|e| {
        warn!("Battery calibration rejected ({:?}), reporting raw volts", e);
        LinearCalibration::identity(battery_config.min_volts, battery_config.max_volts)
    });

    // Status strip on PIO0
    let Pio { common, sm0, .. } = Pio::new(p.PIO0, Irqs);
    let common = PIO_COMMON.init(common);
    let strip = Ws2812::new(common, sm0, p.PIN_15);

    let now = now_ms();
    let hardware = ToolHardware {
        battery: BatteryMonitor::with_calibration(battery_input, battery_config, calibration, now),
        temperature: NtcThermistor::new(therm_input, &tool.thermistor, now),
        tachometer: Tachometer::new(&PULSES, &tool.tachometer, now),
        motor,
        indicator: PixelIndicator::new(strip, &tool.indicator),
        controls: Controls {
            trigger: ActiveLow::new(Input::new(p.PIN_2, Pull::Up)),
            speed_up: ActiveLow::new(Input::new(p.PIN_3, Pull::Up)),
            speed_down: ActiveLow::new(Input::new(p.PIN_4, Pull::Up)),
        },
    };
    info!("Hardware initialized");

    unwrap!(spawner.spawn(tasks::control_task(tool, hardware, motor_enable)));
    unwrap!(spawner.spawn(tasks::telemetry_task()));

    info!("All tasks spawned");
}
