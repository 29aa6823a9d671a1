//! Remote control boundary
//!
//! The network side of the tool is not part of this crate. It hands
//! normalized [`RemoteCommand`]s to the controller and reads back a
//! [`Telemetry`] snapshot. Out-of-range command values are clamped by the
//! controller, never rejected.

use core::fmt::{self, Write};

/// Command received from the remote path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RemoteCommand {
    /// Set the speed to an exact percentage (clamped to 0-100)
    SetSpeed(i32),
    /// Start or stop the motor, subject to the trigger override
    SetActive(bool),
    /// Raw duty write from older clients (clamped to 0-255, 0 stops)
    LegacyDuty(i32),
    /// Liveness ping, acknowledged without any state change
    Heartbeat,
}

/// Snapshot of everything the remote path may read
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Telemetry {
    /// Calibrated battery voltage (V)
    pub battery_volts: f32,
    /// Battery voltage before calibration (V)
    pub battery_raw_volts: f32,
    pub battery_ready: bool,
    /// Motor temperature (°C)
    pub temperature_c: f32,
    pub temperature_ready: bool,
    /// Shaft speed (rev/min)
    pub rpm: f32,
    pub rpm_ready: bool,
    /// Requested speed (0-100%)
    pub speed_percent: u8,
    pub motor_active: bool,
}

impl Telemetry {
    /// Render the broadcast payload
    ///
    /// `{"temp":23.41,"battery":24.02,"rpm":1200,"speed":40,"motor_active":true}`
    pub fn write_json<W: Write>(&self, out: &mut W) -> fmt::Result {
        write!(
            out,
            "{{\"temp\":{:.2},\"battery\":{:.2},\"rpm\":{:.0},\"speed\":{},\"motor_active\":{}}}",
            self.temperature_c, self.battery_volts, self.rpm, self.speed_percent, self.motor_active,
        )
    }
}
