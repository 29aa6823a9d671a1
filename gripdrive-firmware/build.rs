//! Build script for gripdrive-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates tool.toml and bakes it into the binary as a const

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use gripdrive_core::config::{CalibrationPoint, ThermistorPlacement, ToolConfig};
use gripdrive_core::traits::Rgb;

/// Top-level tables understood by the firmware
const KNOWN_SECTIONS: &[&str] = &[
    "battery",
    "thermistor",
    "tachometer",
    "input",
    "motor",
    "indicator",
];

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    setup_linker(&out_dir);
    let config = load_config();
    write_config(&out_dir, &config);
}

/// Set up linker search paths for memory.x
fn setup_linker(out_dir: &Path) {
    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read, parse and validate tool.toml
fn load_config() -> ToolConfig {
    println!("cargo:rerun-if-changed=tool.toml");

    let config_path = Path::new("tool.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: tool.toml not found!                                     ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a tool.toml configuration file.           ║\n\
            ║  Please create one in the gripdrive-firmware directory.          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read tool.toml                                 ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Syntax first, so section errors point at a file that at least parses
    let value: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in tool.toml                         ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    validate_sections(&value);

    let config: ToolConfig = match toml::from_str(&config_content) {
        Ok(config) => config,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid value in tool.toml                               ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    validate_values(&config);

    println!("cargo:warning=tool.toml validated successfully");
    config
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Report a list of problems in one box
fn fail(title: &str, errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Reject unknown or malformed top-level sections
///
/// Serde would silently ignore a misspelled table and fall back to the
/// defaults, which is easy to miss on the bench.
fn validate_sections(value: &toml::Value) {
    let Some(table) = value.as_table() else {
        fail("tool.toml must be a table", &[]);
    };

    let mut errors = Vec::new();

    for (name, section) in table {
        if !KNOWN_SECTIONS.contains(&name.as_str()) {
            errors.push(format!("Unknown section [{}]", name));
        } else if !section.is_table() {
            errors.push(format!("[{}] must be a table", name));
        }
    }

    if !errors.is_empty() {
        fail("Invalid sections in tool.toml", &errors);
    }
}

/// Check values the core would refuse at runtime
fn validate_values(config: &ToolConfig) {
    let floats = [
        ("battery.r_top_ohms", config.battery.r_top_ohms),
        ("battery.r_bottom_ohms", config.battery.r_bottom_ohms),
        ("battery.min_volts", config.battery.min_volts),
        ("battery.max_volts", config.battery.max_volts),
        ("thermistor.series_ohms", config.thermistor.series_ohms),
        ("thermistor.r0_ohms", config.thermistor.r0_ohms),
        ("thermistor.t0_kelvin", config.thermistor.t0_kelvin),
        ("thermistor.beta", config.thermistor.beta),
    ];

    let mut errors: Vec<String> = floats
        .iter()
        .filter(|(_, v)| !v.is_finite())
        .map(|(name, _)| format!("{} must be a finite number", name))
        .collect();

    if let Err(e) = config.validate() {
        errors.push(format!("{:?}", e));
    }

    if !errors.is_empty() {
        fail("Invalid tool configuration", &errors);
    }
}

/// Write `tool_config.rs` holding the configuration as a const
fn write_config(out_dir: &Path, config: &ToolConfig) {
    let mut f = File::create(out_dir.join("tool_config.rs")).unwrap();
    f.write_all(render_config(config).as_bytes()).unwrap();
}

fn float(v: f32) -> String {
    format!("{:?}_f32", v)
}

fn point(p: &CalibrationPoint) -> String {
    format!(
        "CalibrationPoint::new({}, {})",
        float(p.true_value),
        float(p.measured)
    )
}

fn color(c: &Rgb) -> String {
    format!("Rgb::new({}, {}, {})", c.r, c.g, c.b)
}

fn placement(p: ThermistorPlacement) -> &'static str {
    match p {
        ThermistorPlacement::HighSide => "ThermistorPlacement::HighSide",
        ThermistorPlacement::LowSide => "ThermistorPlacement::LowSide",
    }
}

fn render_config(c: &ToolConfig) -> String {
    let b = &c.battery;
    let t = &c.thermistor;
    let i = &c.indicator;

    format!(
        "// Generated from tool.toml by build.rs\n\
         \n\
         pub const TOOL_CONFIG: ToolConfig = ToolConfig {{\n\
         \x20   battery: BatteryConfig {{\n\
         \x20       r_top_ohms: {},\n\
         \x20       r_bottom_ohms: {},\n\
         \x20       cal_low: {},\n\
         \x20       cal_high: {},\n\
         \x20       min_volts: {},\n\
         \x20       max_volts: {},\n\
         \x20       sample_interval_ms: {},\n\
         \x20       samples: {},\n\
         \x20   }},\n\
         \x20   thermistor: ThermistorConfig {{\n\
         \x20       placement: {},\n\
         \x20       series_ohms: {},\n\
         \x20       r0_ohms: {},\n\
         \x20       t0_kelvin: {},\n\
         \x20       beta: {},\n\
         \x20       adc_max: {},\n\
         \x20       sample_interval_ms: {},\n\
         \x20       samples: {},\n\
         \x20   }},\n\
         \x20   tachometer: TachometerConfig {{\n\
         \x20       pulses_per_rev: {},\n\
         \x20       update_interval_ms: {},\n\
         \x20   }},\n\
         \x20   input: InputConfig {{\n\
         \x20       debounce_ms: {},\n\
         \x20       speed_step: {},\n\
         \x20   }},\n\
         \x20   motor: MotorConfig {{\n\
         \x20       pwm_frequency_hz: {},\n\
         \x20   }},\n\
         \x20   indicator: IndicatorConfig {{\n\
         \x20       led_count: {},\n\
         \x20       brightness: {},\n\
         \x20       default_period_ms: {},\n\
         \x20       animation_refresh_ms: {},\n\
         \x20       idle_pulse_period_ms: {},\n\
         \x20       warmup_ms: {},\n\
         \x20       setup_color: {},\n\
         \x20       setup_period_ms: {},\n\
         \x20       active_color: {},\n\
         \x20       idle_color: {},\n\
         \x20   }},\n\
         }};\n",
        float(b.r_top_ohms),
        float(b.r_bottom_ohms),
        point(&b.cal_low),
        point(&b.cal_high),
        float(b.min_volts),
        float(b.max_volts),
        b.sample_interval_ms,
        b.samples,
        placement(t.placement),
        float(t.series_ohms),
        float(t.r0_ohms),
        float(t.t0_kelvin),
        float(t.beta),
        t.adc_max,
        t.sample_interval_ms,
        t.samples,
        c.tachometer.pulses_per_rev,
        c.tachometer.update_interval_ms,
        c.input.debounce_ms,
        c.input.speed_step,
        c.motor.pwm_frequency_hz,
        i.led_count,
        i.brightness,
        i.default_period_ms,
        i.animation_refresh_ms,
        i.idle_pulse_period_ms,
        i.warmup_ms,
        color(&i.setup_color),
        i.setup_period_ms,
        color(&i.active_color),
        color(&i.idle_color),
    )
}
