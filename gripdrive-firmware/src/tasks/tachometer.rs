//! Tachometer edge task
//!
//! Runs on the high-priority interrupt executor so FG edges are counted
//! even while the control pass is busy.

use defmt::*;
use embassy_rp::gpio::Input;

use gripdrive_drivers::sensor::PulseCounter;

/// Count every rising edge of the motor FG output
#[embassy_executor::task]
pub async fn tachometer_task(mut fg: Input<'static>, pulses: &'static PulseCounter) {
    info!("Tachometer task started");

    loop {
        fg.wait_for_rising_edge().await;
        pulses.record();
    }
}
