//! Build script for avgang-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates marquee.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate marquee.toml at compile time
///
/// The firmware parser falls back to defaults on bad input, so mistakes are
/// caught here instead of silently on the board.
fn validate_config() {
    println!("cargo:rerun-if-changed=marquee.toml");

    let config_path = Path::new("marquee.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: marquee.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds marquee.toml as its configuration.          ║\n\
            ║  Please create one in the avgang-firmware directory.             ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read marquee.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in marquee.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_display(&config, &mut errors);
    validate_scroll(&config, &mut errors);
    validate_input(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in marquee.toml                    ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=marquee.toml validated successfully");
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

/// Only the sections the firmware parser knows, each a table
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        return;
    };

    for (name, value) in root {
        match name.as_str() {
            "display" | "scroll" | "input" => {
                if !value.is_table() {
                    errors.push(format!("[{}] must be a table", name));
                }
            }
            _ => errors.push(format!("unknown section [{}]", name)),
        }
    }
}

fn section<'a>(config: &'a toml::Value, name: &str) -> Option<&'a toml::Table> {
    config.get(name).and_then(|s| s.as_table())
}

/// Check an integer field against an inclusive range
fn check_int(
    table: &toml::Table,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) {
    match table.get(key) {
        None => {}
        Some(toml::Value::Integer(v)) if (min..=max).contains(v) => {}
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
        }
        Some(_) => errors.push(format!("[{}] {} must be an integer", section, key)),
    }
}

fn check_bool(table: &toml::Table, section: &str, key: &str, errors: &mut Vec<String>) {
    if let Some(value) = table.get(key) {
        if !value.is_bool() {
            errors.push(format!("[{}] {} must be true or false", section, key));
        }
    }
}

fn validate_display(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(display) = section(config, "display") else {
        return;
    };

    check_int(display, "display", "cascaded", 1, 16, errors);
    check_int(display, "display", "brightness", 0, 255, errors);
    check_int(display, "display", "spi_frequency_hz", 1, 10_000_000, errors);
    check_bool(display, "display", "reverse_order", errors);

    if let Some(value) = display.get("block_orientation") {
        if !matches!(value.as_integer(), Some(0 | 90 | -90)) {
            errors.push("[display] block_orientation must be 0, 90 or -90".to_string());
        }
    }

    if let Some(value) = display.get("rotate") {
        if !matches!(value.as_integer(), Some(0 | 2)) {
            errors.push("[display] rotate must be 0 or 2".to_string());
        }
    }
}

fn validate_scroll(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(scroll) = section(config, "scroll") else {
        return;
    };

    match scroll.get("speed_px_per_s") {
        None => {}
        Some(toml::Value::Float(v)) if v.is_finite() && *v >= 0.0 => {}
        Some(toml::Value::Integer(v)) if *v >= 0 => {}
        Some(_) => errors.push("[scroll] speed_px_per_s must be a number >= 0".to_string()),
    }

    check_int(scroll, "scroll", "pause_ms", 0, u32::MAX as i64, errors);
    check_int(scroll, "scroll", "frame_interval_ms", 1, 1000, errors);
    check_int(scroll, "scroll", "baseline_y", -8, 7, errors);
    check_bool(scroll, "scroll", "clamp_pause", errors);
}

fn validate_input(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(input) = section(config, "input") else {
        return;
    };

    check_int(input, "input", "baudrate", 1, 1_000_000, errors);
    check_int(input, "input", "end_of_stream", 0, 255, errors);

    if let Some(toml::Value::Integer(byte)) = input.get("end_of_stream") {
        if *byte == 0x0A || *byte == 0x0D {
            errors.push("[input] end_of_stream cannot be CR or LF".to_string());
        }
    }
}
