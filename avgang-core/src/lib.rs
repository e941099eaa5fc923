//! Board-agnostic core logic for the departure marquee
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Display and text-metrics traits
//! - Scroll/pause state machine and time-suffix matching
//! - Frame presentation and the per-frame driving step
//! - Configuration types and the `marquee.toml` parser

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod marquee;
pub mod traits;
