//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use gripdrive_core::remote::{RemoteCommand, Telemetry};

/// Channel capacity for remote commands
const REMOTE_CHANNEL_SIZE: usize = 8;

/// Commands from the remote transport, drained by the control task at the
/// start of every pass
pub static REMOTE_COMMANDS: Channel<CriticalSectionRawMutex, RemoteCommand, REMOTE_CHANNEL_SIZE> =
    Channel::new();

/// Latest telemetry snapshot (updated by the control task)
pub static TELEMETRY: Signal<CriticalSectionRawMutex, Telemetry> = Signal::new();
