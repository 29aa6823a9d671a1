//! Tool configuration
//!
//! `build.rs` validates tool.toml and renders it as the `TOOL_CONFIG`
//! const included below. Nothing is parsed at runtime.

use gripdrive_core::config::{
    BatteryConfig, CalibrationPoint, IndicatorConfig, InputConfig, MotorConfig, TachometerConfig,
    ThermistorConfig, ThermistorPlacement, ToolConfig,
};
use gripdrive_core::traits::Rgb;

include!(concat!(env!("OUT_DIR"), "/tool_config.rs"));
