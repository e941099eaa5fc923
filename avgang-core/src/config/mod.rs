//! Configuration types and parsing
//!
//! The firmware embeds `marquee.toml` and parses it with [`parse_config`].

pub mod parse;
pub mod types;

pub use parse::{parse_config, ParseError};
pub use types::*;
