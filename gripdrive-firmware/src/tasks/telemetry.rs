//! Telemetry task
//!
//! Every 250 ms, logs the latest snapshot published by the control task as
//! a status line and as the JSON payload served to remote clients.

use defmt::*;
use embassy_time::{Duration, Ticker};
use heapless::String;

use crate::channels::TELEMETRY;

/// Reporting period (ms)
const TELEMETRY_PERIOD_MS: u64 = 250;

/// Room for the largest payload `Telemetry::write_json` produces
const PAYLOAD_CAPACITY: usize = 128;

#[embassy_executor::task]
pub async fn telemetry_task() {
    info!("Telemetry task started");

    let mut ticker = Ticker::every(Duration::from_millis(TELEMETRY_PERIOD_MS));
    let mut payload: String<PAYLOAD_CAPACITY> = String::new();

    loop {
        ticker.next().await;

        // Nothing new since the last report
        let Some(telemetry) = TELEMETRY.try_take() else {
            continue;
        };

        info!(
            "Temperature: {} / Battery: {} / RPM: {} / Speed: {}%",
            telemetry.temperature_c,
            telemetry.battery_volts,
            telemetry.rpm,
            telemetry.speed_percent
        );

        payload.clear();
        if telemetry.write_json(&mut payload).is_ok() {
            info!("{}", payload.as_str());
        } else {
            warn!("Telemetry payload exceeds {} bytes", PAYLOAD_CAPACITY);
        }
    }
}
