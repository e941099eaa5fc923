//! Minimal TOML parser for the marquee configuration
//!
//! Handles only the subset `marquee.toml` uses and allocates nothing.
//!
//! Supported features:
//! - Key = value pairs (string, integer, float, boolean)
//! - `[display]`, `[scroll]` and `[input]` section headers
//! - Comments (# ...), including after a value
//!
//! Unknown keys are ignored. Values are range-checked by
//! [`MarqueeConfig::validate`] once the whole file is read.

use heapless::String;

use super::types::{BlockOrientation, ConfigError, MarqueeConfig, Rotation};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Value of the wrong type or out of range for its field
    InvalidValue,
    /// Parsed, but the values do not form a usable configuration
    Invalid(ConfigError),
}

impl From<ConfigError> for ParseError {
    fn from(e: ConfigError) -> Self {
        ParseError::Invalid(e)
    }
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Display,
    Scroll,
    Input,
}

/// Parse TOML configuration into a validated `MarqueeConfig`
///
/// Keys that are not present keep their defaults.
pub fn parse_config(input: &str) -> Result<MarqueeConfig, ParseError> {
    let mut config = MarqueeConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config)?;
        }
    }

    config.validate()?;
    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "display" => Ok(Section::Display),
        "scroll" => Ok(Section::Scroll),
        "input" => Ok(Section::Input),
        _ => Err(ParseError::InvalidSection),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut MarqueeConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Display => {
            let display = &mut config.display;
            match key {
                "cascaded" => display.cascaded = parse_int(value)?,
                "block_orientation" => {
                    display.block_orientation = BlockOrientation::from_degrees(parse_int(value)?)
                        .ok_or(ParseError::InvalidValue)?;
                }
                "rotate" => display.rotate = Rotation::from_quarter_turns(parse_int(value)?)?,
                "reverse_order" => display.reverse_order = parse_bool(value)?,
                "brightness" | "contrast" => display.brightness = parse_int(value)?,
                "spi_frequency_hz" => display.spi_frequency_hz = parse_int(value)?,
                _ => {}
            }
        }
        Section::Scroll => {
            let scroll = &mut config.scroll;
            match key {
                "speed_px_per_s" => scroll.speed_px_per_s = parse_float(value)?,
                "pause_ms" => scroll.pause_ms = parse_int(value)?,
                "frame_interval_ms" => scroll.frame_interval_ms = parse_int(value)?,
                "clamp_pause" => scroll.clamp_pause = parse_bool(value)?,
                "baseline_y" => scroll.baseline_y = parse_int(value)?,
                _ => {}
            }
        }
        Section::Input => match key {
            "baudrate" => config.input.baudrate = parse_int(value)?,
            "end_of_stream" => config.input.end_of_stream = parse_byte(value)?,
            _ => {}
        },
        Section::Root => {}
    }
    Ok(())
}

/// Split `key = value`, dropping a trailing comment
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    let value = match value.find('#') {
        // A '#' inside a string is content
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn unquote(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Integer, allowing TOML digit separators (`115_200`)
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    let mut digits: String<24> = String::new();
    for ch in unquote(value).chars().filter(|&c| c != '_') {
        digits.push(ch).map_err(|_| ParseError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_float(value: &str) -> Result<f32, ParseError> {
    unquote(value).parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Byte value written as decimal or `0x..` hex
fn parse_byte(value: &str) -> Result<u8, ParseError> {
    let value = unquote(value);
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).map_err(|_| ParseError::InvalidValue),
        None => parse_int(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(parse_key_value("cascaded = 4"), Some(("cascaded", "4")));
        assert_eq!(
            parse_key_value("brightness = 32 # dim at night"),
            Some(("brightness", "32"))
        );
        assert_eq!(parse_key_value("name = \"a # b\""), Some(("name", "\"a # b\"")));
        assert_eq!(parse_key_value("cascaded ="), None);
        assert_eq!(parse_key_value("no equals sign"), None);
    }

    #[test]
    fn test_parse_int_and_byte() {
        assert_eq!(parse_int::<u32>("115_200"), Ok(115_200));
        assert_eq!(parse_int::<i8>("-3"), Ok(-3));
        assert_eq!(parse_int::<u8>("256"), Err(ParseError::InvalidValue));
        assert_eq!(parse_byte("0x04"), Ok(4));
        assert_eq!(parse_byte("\"0x1A\""), Ok(0x1A));
        assert_eq!(parse_byte("26"), Ok(26));
        assert_eq!(parse_byte("0xZZ"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_parse_section_header() {
        assert_eq!(parse_section_header("display"), Ok(Section::Display));
        assert_eq!(parse_section_header(" scroll "), Ok(Section::Scroll));
        assert_eq!(parse_section_header("input"), Ok(Section::Input));
        assert_eq!(parse_section_header("stepper"), Err(ParseError::InvalidSection));
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse_config(""), Ok(MarqueeConfig::default()));
        assert_eq!(parse_config("# only a comment\n"), Ok(MarqueeConfig::default()));
    }

    #[test]
    fn test_parse_full_config() {
        let config_str = r#"
# Four FC-16 modules on SPI0
[display]
cascaded = 8
block_orientation = 90
rotate = 2
reverse_order = true
brightness = 64
spi_frequency_hz = 2_000_000

[scroll]
speed_px_per_s = 22.5
pause_ms = 5000
frame_interval_ms = 25
clamp_pause = false
baseline_y = 1

[input]
baudrate = 9600
end_of_stream = 0x1A
"#;

        let config = parse_config(config_str).unwrap();
        assert_eq!(config.display.cascaded, 8);
        assert_eq!(config.display.width(), 64);
        assert_eq!(config.display.block_orientation, BlockOrientation::Deg90);
        assert_eq!(config.display.rotate, Rotation::UpsideDown);
        assert!(config.display.reverse_order);
        assert_eq!(config.display.brightness, 64);
        assert_eq!(config.display.spi_frequency_hz, 2_000_000);
        assert_eq!(config.scroll.speed_px_per_s, 22.5);
        assert_eq!(config.scroll.pause_ms, 5000);
        assert_eq!(config.scroll.frame_interval_ms, 25);
        assert!(!config.scroll.clamp_pause);
        assert_eq!(config.scroll.baseline_y, 1);
        assert_eq!(config.input.baudrate, 9600);
        assert_eq!(config.input.end_of_stream, 0x1A);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config("[scroll]\npause_ms = 3000\n").unwrap();
        assert_eq!(config.scroll.pause_ms, 3000);
        assert_eq!(config.scroll.speed_px_per_s, 15.0);
        assert_eq!(config.display, MarqueeConfig::default().display);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let config = parse_config("[display]\nwiring = \"fc16\"\ncascaded = 2\n").unwrap();
        assert_eq!(config.display.cascaded, 2);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert_eq!(
            parse_config("[display]\nblock_orientation = 45\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[display]\nrotate = 1\n"),
            Err(ParseError::Invalid(ConfigError::UnsupportedRotation))
        );
        assert_eq!(
            parse_config("[scroll]\nclamp_pause = yes\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[display]\ncascaded = 0\n"),
            Err(ParseError::Invalid(ConfigError::CascadedOutOfRange))
        );
        assert_eq!(parse_config("[heater]\n"), Err(ParseError::InvalidSection));
    }
}
