//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in avgang-core for the marquee hardware:
//!
//! - MAX7219 cascaded LED matrix driver over `embedded-hal` SPI
//! - `embedded-graphics` frame buffer for the matrix
//! - Latin-1 text rendering with charset substitution
//! - [`MatrixDisplay`], the marquee backend built from the three

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod display;
pub mod font;
pub mod max7219;

pub use display::MatrixDisplay;
