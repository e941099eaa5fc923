//! Configuration loading
//!
//! `marquee.toml` is compiled into the firmware and validated by build.rs.
//! Edit it and rebuild to customize.

use defmt::*;

use avgang_core::config::{parse_config, MarqueeConfig};

/// Embedded configuration
const EMBEDDED_CONFIG: &str = include_str!("../marquee.toml");

/// Parse the embedded configuration
///
/// Falls back to defaults if the file cannot be parsed.
pub fn load() -> MarqueeConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration");
            config
        }
        Err(e) => {
            warn!("Failed to parse embedded config: {:?}", e);
            warn!("Using default configuration");
            MarqueeConfig::default()
        }
    }
}
