//! Build script for adc-bridge-firmware
//!
//! - Passes the cortex-m-rt and defmt linker scripts
//! - Validates bridge.toml at compile time
//! - Generates `bridge_config.rs` for `src/config.rs`

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Capacity of the channel map in adc-bridge-core
const MAX_CHANNELS: usize = 16;

/// Highest external ADC input on STM32F042
const MAX_INPUT: i64 = 15;

/// Sample times accepted by SMPR, in ADC clock cycles
const SAMPLE_TIMES: [(f64, &str); 8] = [
    (1.5, "Cycles1_5"),
    (7.5, "Cycles7_5"),
    (13.5, "Cycles13_5"),
    (28.5, "Cycles28_5"),
    (41.5, "Cycles41_5"),
    (55.5, "Cycles55_5"),
    (71.5, "Cycles71_5"),
    (239.5, "Cycles239_5"),
];

/// Values extracted from bridge.toml
struct Board {
    address: i64,
    timing: i64,
    bus_priority: i64,
    adc_priority: i64,
    sample_time: &'static str,
    channels: Vec<String>,
}

fn main() {
    setup_linker();
    let board = load_config();
    generate_config(&board);
}

/// Linker scripts for the firmware binary only
fn setup_linker() {
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read, parse and validate bridge.toml
fn load_config() -> Board {
    println!("cargo:rerun-if-changed=bridge.toml");

    let config_path = Path::new("bridge.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: bridge.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a bridge.toml configuration file in the   ║\n\
            ║  adc-bridge-firmware directory.                                  ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read bridge.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in bridge.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let mut errors = Vec::new();

    let address = integer(&config, "bus", "address", 0x50, &mut errors);
    let timing = integer(&config, "bus", "timing", 0x2000_090E, &mut errors);
    let bus_priority = integer(&config, "bus", "priority", 3, &mut errors);
    let adc_priority = integer(&config, "adc", "priority", 2, &mut errors);
    let sample_time = sample_time(&config, &mut errors);
    let channels = channels(&config, &mut errors);

    if !(0x08..=0x77).contains(&address) {
        errors.push(format!(
            "bus.address 0x{:02X} is reserved or not a 7-bit address (use 0x08-0x77)",
            address
        ));
    }
    if !(0..=i64::from(u32::MAX)).contains(&timing) {
        errors.push("bus.timing must fit in 32 bits".to_string());
    }
    for (name, priority) in [("bus.priority", bus_priority), ("adc.priority", adc_priority)] {
        if !(0..=3).contains(&priority) {
            errors.push(format!("{} must be 0-3, got {}", name, priority));
        }
    }
    if adc_priority >= bus_priority {
        errors.push(format!(
            "adc.priority ({}) must be more urgent (lower) than bus.priority ({})",
            adc_priority, bus_priority
        ));
    }

    report(&errors);

    println!("cargo:warning=bridge.toml validated successfully");

    Board {
        address,
        timing,
        bus_priority,
        adc_priority,
        sample_time,
        channels,
    }
}

/// Integer field in a section, with a default when absent
fn integer(
    config: &toml::Value,
    section: &str,
    key: &str,
    default: i64,
    errors: &mut Vec<String>,
) -> i64 {
    match config.get(section).and_then(|s| s.get(key)) {
        None => default,
        Some(toml::Value::Integer(value)) => *value,
        Some(_) => {
            errors.push(format!("{}.{} must be an integer", section, key));
            default
        }
    }
}

/// `adc.sample_time` mapped to a `SampleTime` variant
fn sample_time(config: &toml::Value, errors: &mut Vec<String>) -> &'static str {
    let cycles = match config.get("adc").and_then(|s| s.get("sample_time")) {
        None => return "Cycles71_5",
        Some(toml::Value::Float(cycles)) => *cycles,
        Some(toml::Value::Integer(cycles)) => *cycles as f64,
        Some(_) => {
            errors.push("adc.sample_time must be a number of cycles".to_string());
            return "Cycles71_5";
        }
    };

    match SAMPLE_TIMES.iter().find(|(c, _)| (*c - cycles).abs() < f64::EPSILON) {
        Some((_, variant)) => variant,
        None => {
            errors.push(format!(
                "adc.sample_time {} is not supported (1.5, 7.5, 13.5, 28.5, 41.5, 55.5, 71.5, 239.5)",
                cycles
            ));
            "Cycles71_5"
        }
    }
}

/// `[[channel]]` entries as `PhysicalChannel` expressions
fn channels(config: &toml::Value, errors: &mut Vec<String>) -> Vec<String> {
    let Some(entries) = config.get("channel").and_then(|c| c.as_array()) else {
        errors.push("At least one [[channel]] must be defined".to_string());
        return Vec::new();
    };

    if entries.is_empty() {
        errors.push("At least one [[channel]] must be defined".to_string());
    }
    if entries.len() > MAX_CHANNELS {
        errors.push(format!(
            "{} channels defined, at most {} are supported",
            entries.len(),
            MAX_CHANNELS
        ));
    }

    let mut seen: Vec<Option<i64>> = Vec::new();
    let mut out = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        let kind = entry.get("kind").and_then(|k| k.as_str()).unwrap_or("");
        let number = entry.get("number").and_then(|n| n.as_integer());

        let (source, expr) = match (kind, number) {
            ("input", Some(n)) | ("supply", Some(n)) if (0..=MAX_INPUT).contains(&n) => {
                let variant = if kind == "input" { "Input" } else { "SupplyMonitor" };
                (Some(n), format!("PhysicalChannel::{}({})", variant, n))
            }
            ("input", Some(n)) | ("supply", Some(n)) => {
                errors.push(format!(
                    "channel {}: number {} out of range (0-{})",
                    index, n, MAX_INPUT
                ));
                continue;
            }
            ("input", None) | ("supply", None) => {
                errors.push(format!("channel {}: '{}' needs a number", index, kind));
                continue;
            }
            ("temperature", _) => (None, "PhysicalChannel::TemperatureSensor".to_string()),
            _ => {
                errors.push(format!(
                    "channel {}: kind must be \"input\", \"supply\" or \"temperature\"",
                    index
                ));
                continue;
            }
        };

        if seen.contains(&source) {
            errors.push(format!(
                "channel {}: physical source already used by an earlier channel",
                index
            ));
        }
        seen.push(source);
        out.push(expr);
    }

    out
}

/// Abort the build with every collected error
fn report(errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    let error_list: String = errors
        .iter()
        .map(|e| format!("║  • {:<62} ║", e))
        .collect::<Vec<_>>()
        .join("\n");
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: Invalid bridge.toml                                      ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        error_list
    );
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write `$OUT_DIR/bridge_config.rs`
fn generate_config(board: &Board) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));

    let code = format!(
        "// Generated by build.rs from bridge.toml\n\
        \n\
        const CHANNELS: [PhysicalChannel; {count}] = [\n{channels}];\n\
        \n\
        /// Board configuration from bridge.toml\n\
        pub const CONFIG: BridgeConfig = BridgeConfig {{\n    \
            own_address: 0x{address:02X},\n    \
            bus_priority: {bus_priority},\n    \
            adc_priority: {adc_priority},\n    \
            channels: &CHANNELS,\n\
        }};\n\
        \n\
        /// I2C1 TIMINGR value\n\
        pub const I2C_TIMING: u32 = 0x{timing:08X};\n\
        \n\
        /// ADC sampling time\n\
        pub const SAMPLE_TIME: SampleTime = SampleTime::{sample_time};\n",
        count = board.channels.len(),
        channels = board
            .channels
            .iter()
            .map(|c| format!("    {},\n", c))
            .collect::<String>(),
        address = board.address,
        bus_priority = board.bus_priority,
        adc_priority = board.adc_priority,
        timing = board.timing,
        sample_time = board.sample_time,
    );

    let dest = out_dir.join("bridge_config.rs");
    if let Err(e) = fs::write(&dest, code) {
        panic!("failed to write {}: {}", dest.display(), e);
    }
}
