//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod control;
pub mod tachometer;
pub mod telemetry;

pub use control::{control_task, ToolHardware};
pub use tachometer::tachometer_task;
pub use telemetry::telemetry_task;

use embassy_time::Instant;

/// Milliseconds since boot on the wrapping clock the core expects
pub fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}
