//! Cooperative scheduler
//!
//! Composes samplers, input arbitration, motor drive and indicator into one
//! non-blocking control pass.

pub mod controller;
pub mod events;

pub use controller::{Controls, ToolController, ToolParts};
pub use events::{ControlEvent, EventLog, SensorKind, MAX_EVENTS};
