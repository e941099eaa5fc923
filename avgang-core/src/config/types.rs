//! Configuration type definitions
//!
//! These types describe the matrix hardware, the animation and the message
//! feed. They are filled from `marquee.toml` by [`super::parse_config`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Most modules a single chain is driven with
pub const MAX_CASCADED: u8 = 16;

/// Pixel columns (and rows) per 8x8 module
pub const MODULE_SIZE: u32 = 8;

/// Configuration validation error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// `cascaded` outside 1..=16
    CascadedOutOfRange,
    /// Rotation the matrix cannot be driven with
    UnsupportedRotation,
    /// Scroll speed negative or not a number
    InvalidSpeed,
    /// Frame interval of zero
    InvalidFrameInterval,
    /// Baudrate of zero
    InvalidBaudrate,
    /// End-of-stream byte collides with line framing
    InvalidEndOfStream,
}

/// Orientation of each 8x8 block relative to the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BlockOrientation {
    /// Rows of each block run along the chain
    Deg0,
    /// Blocks turned a quarter clockwise
    Deg90,
    /// Blocks turned a quarter anticlockwise (FC-16 modules)
    #[default]
    DegMinus90,
}

impl BlockOrientation {
    /// Build from degrees as written in the config file
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees {
            0 => Some(Self::Deg0),
            90 => Some(Self::Deg90),
            -90 => Some(Self::DegMinus90),
            _ => None,
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::DegMinus90 => -90,
        }
    }
}

/// Whole-display rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rotation {
    #[default]
    Normal,
    /// Turned 180 degrees
    UpsideDown,
}

impl Rotation {
    /// Build from the quarter-turn count (0-3) in the config file
    ///
    /// Quarter turns 1 and 3 would make the display 8 pixels wide and are
    /// rejected.
    pub fn from_quarter_turns(turns: u8) -> Result<Self, ConfigError> {
        match turns {
            0 => Ok(Self::Normal),
            2 => Ok(Self::UpsideDown),
            _ => Err(ConfigError::UnsupportedRotation),
        }
    }
}

/// Dot-matrix hardware configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Number of chained 8x8 modules
    pub cascaded: u8,
    /// Orientation of each block
    pub block_orientation: BlockOrientation,
    /// Whole-display rotation
    pub rotate: Rotation,
    /// First module in the chain is the rightmost one
    pub reverse_order: bool,
    /// Brightness, 0-255
    pub brightness: u8,
    /// SPI clock
    pub spi_frequency_hz: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            cascaded: 4,
            block_orientation: BlockOrientation::DegMinus90,
            rotate: Rotation::Normal,
            reverse_order: false,
            brightness: 16,
            spi_frequency_hz: 1_000_000,
        }
    }
}

impl DisplayConfig {
    /// Display width in pixel columns
    pub fn width(&self) -> u32 {
        u32::from(self.cascaded) * MODULE_SIZE
    }

    /// Display height in pixel rows
    pub fn height(&self) -> u32 {
        MODULE_SIZE
    }
}

/// Scroll animation configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScrollConfig {
    /// Scroll speed in pixels per second
    pub speed_px_per_s: f32,
    /// How long a time suffix stays pinned at the right edge
    pub pause_ms: u32,
    /// Target time between frames
    pub frame_interval_ms: u16,
    /// Pin the scroll distance to the pause point when pausing
    pub clamp_pause: bool,
    /// Row of the text's top edge
    pub baseline_y: i8,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            speed_px_per_s: 15.0,
            pause_ms: 10_000,
            frame_interval_ms: 20,
            clamp_pause: true,
            baseline_y: 0,
        }
    }
}

/// Message feed configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InputConfig {
    /// UART baudrate
    pub baudrate: u32,
    /// Byte that ends the feed
    pub end_of_stream: u8,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            baudrate: 115_200,
            end_of_stream: avgang_protocol::END_OF_STREAM,
        }
    }
}

/// Complete marquee configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MarqueeConfig {
    pub display: DisplayConfig,
    pub scroll: ScrollConfig,
    pub input: InputConfig,
}

impl MarqueeConfig {
    /// Check that every value is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.cascaded == 0 || self.display.cascaded > MAX_CASCADED {
            return Err(ConfigError::CascadedOutOfRange);
        }
        let speed = self.scroll.speed_px_per_s;
        if !speed.is_finite() || speed < 0.0 {
            return Err(ConfigError::InvalidSpeed);
        }
        if self.scroll.frame_interval_ms == 0 {
            return Err(ConfigError::InvalidFrameInterval);
        }
        if self.input.baudrate == 0 {
            return Err(ConfigError::InvalidBaudrate);
        }
        if matches!(self.input.end_of_stream, b'\n' | b'\r') {
            return Err(ConfigError::InvalidEndOfStream);
        }
        Ok(())
    }
}
