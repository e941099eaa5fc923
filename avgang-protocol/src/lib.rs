//! Avgång Message Feed Protocol
//!
//! This crate defines how the message producer (a host computer polling a
//! departure API, a shell pipe, anything that can write to a serial port)
//! talks to the marquee. The protocol is deliberately plain text:
//!
//! ```text
//! 134 Östberghöjden 3 min\n     -> show this message
//! \n                            -> blank the display
//! 0x04                          -> end of stream, shut down
//! ```
//!
//! Each line is one complete message. Carriage returns are ignored, leading
//! and trailing whitespace is stripped, and lines longer than
//! [`MAX_LINE_LEN`] bytes are truncated on a UTF-8 character boundary.
//! Bytes that are not valid UTF-8 are replaced rather than rejected, so a
//! garbled line still reaches the display.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod line;

pub use line::{Line, LineParser, LineText, END_OF_STREAM, MAX_LINE_LEN};
