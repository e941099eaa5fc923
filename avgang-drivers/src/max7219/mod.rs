//! MAX7219 LED matrix driver (cascaded 8x8 modules over SPI)
//!
//! Each MAX7219 drives one 8x8 module. Modules are daisy-chained: a 16-bit
//! word shifted into the first device falls through to the next one once
//! more words follow, so one SPI transaction of `2 * N` bytes addresses the
//! same register on all `N` devices. The word for the device furthest down
//! the chain goes out first.
//!
//! # Word Format
//!
//! - Register address (1 byte)
//! - Data (1 byte)
//!
//! Digit registers 1-8 hold one row of 8 LEDs each; bit 7 is the leftmost
//! LED when the module is in its native orientation.

mod canvas;

pub use canvas::{Canvas, MAX_COLUMNS};

use avgang_core::config::{BlockOrientation, DisplayConfig, MAX_CASCADED, MODULE_SIZE};
use avgang_core::traits::DisplayError;
use embedded_hal::spi::SpiDevice;

/// MAX7219 register addresses
pub mod reg {
    /// No-op, used to skip a device in the chain
    pub const NOOP: u8 = 0x00;
    /// First digit (row) register; digits are 0x01..=0x08
    pub const DIGIT0: u8 = 0x01;
    /// BCD decode per digit
    pub const DECODE_MODE: u8 = 0x09;
    /// Brightness, 0x0-0xF
    pub const INTENSITY: u8 = 0x0A;
    /// Number of digits scanned, minus one
    pub const SCAN_LIMIT: u8 = 0x0B;
    /// 0 = shutdown, 1 = normal operation
    pub const SHUTDOWN: u8 = 0x0C;
    /// 1 = all LEDs on
    pub const DISPLAY_TEST: u8 = 0x0F;
}

/// Highest intensity register value
pub const MAX_INTENSITY: u8 = 0x0F;

/// Bytes per register write to the whole chain
const MAX_TX_LEN: usize = 2 * MAX_CASCADED as usize;

/// MAX7219 driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Max7219Error<E> {
    /// SPI transfer failed
    Spi(E),
    /// Module count outside 1..=16
    InvalidCascade,
}

impl<E> From<Max7219Error<E>> for DisplayError {
    fn from(e: Max7219Error<E>) -> Self {
        match e {
            Max7219Error::Spi(_) => DisplayError::Bus,
            Max7219Error::InvalidCascade => DisplayError::InvalidConfig,
        }
    }
}

#[cfg(feature = "defmt")]
impl<E> defmt::Format for Max7219Error<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Max7219Error::Spi(_) => defmt::write!(f, "Spi"),
            Max7219Error::InvalidCascade => defmt::write!(f, "InvalidCascade"),
        }
    }
}

/// Map a 0-255 brightness onto the 16 intensity steps
pub fn contrast_to_intensity(level: u8) -> u8 {
    level >> 4
}

/// Driver for a chain of MAX7219 devices
pub struct Max7219<SPI> {
    spi: SPI,
    /// Devices in the chain
    devices: usize,
    orientation: BlockOrientation,
    /// Chain position 0 drives the rightmost module
    reverse_order: bool,
    /// Last digit rows sent, per chain position
    shadow: [[u8; 8]; MAX_CASCADED as usize],
    tx: [u8; MAX_TX_LEN],
}

impl<SPI> Max7219<SPI>
where
    SPI: SpiDevice,
{
    /// Create a driver for the chain described by `config`
    ///
    /// Does not touch the bus; call [`Max7219::init`] next.
    pub fn new(spi: SPI, config: &DisplayConfig) -> Result<Self, Max7219Error<SPI::Error>> {
        if config.cascaded == 0 || config.cascaded > MAX_CASCADED {
            return Err(Max7219Error::InvalidCascade);
        }

        Ok(Self {
            spi,
            devices: usize::from(config.cascaded),
            orientation: config.block_orientation,
            reverse_order: config.reverse_order,
            shadow: [[0; 8]; MAX_CASCADED as usize],
            tx: [0; MAX_TX_LEN],
        })
    }

    /// Number of devices in the chain
    pub fn devices(&self) -> usize {
        self.devices
    }

    /// Put every device into a known state with all LEDs off
    pub fn init(&mut self, intensity: u8) -> Result<(), Max7219Error<SPI::Error>> {
        self.write_all(reg::DISPLAY_TEST, 0)?;
        self.write_all(reg::SCAN_LIMIT, 7)?;
        self.write_all(reg::DECODE_MODE, 0)?;
        self.clear()?;
        self.set_intensity(intensity)?;
        self.set_power(true)
    }

    /// Set intensity (0-15) on every device
    pub fn set_intensity(&mut self, intensity: u8) -> Result<(), Max7219Error<SPI::Error>> {
        self.write_all(reg::INTENSITY, intensity.min(MAX_INTENSITY))
    }

    /// Leave or enter shutdown mode
    pub fn set_power(&mut self, on: bool) -> Result<(), Max7219Error<SPI::Error>> {
        self.write_all(reg::SHUTDOWN, u8::from(on))
    }

    /// Turn every LED off
    pub fn clear(&mut self) -> Result<(), Max7219Error<SPI::Error>> {
        for digit in 0..8u8 {
            self.write_all(reg::DIGIT0 + digit, 0)?;
        }
        self.shadow = [[0; 8]; MAX_CASCADED as usize];
        Ok(())
    }

    /// Send `canvas` to the chain
    ///
    /// Only digit rows that changed since the last flush are written.
    pub fn flush(&mut self, canvas: &Canvas) -> Result<(), Max7219Error<SPI::Error>> {
        for digit in 0..8usize {
            let mut rows = [0u8; MAX_CASCADED as usize];
            let mut changed = false;
            for (position, row) in rows[..self.devices].iter_mut().enumerate() {
                *row = self.digit_row(canvas, self.module_at(position), digit);
                changed |= self.shadow[position][digit] != *row;
            }
            if !changed {
                continue;
            }

            let len = 2 * self.devices;
            for (position, row) in rows[..self.devices].iter().enumerate() {
                // Furthest device first
                let i = 2 * (self.devices - 1 - position);
                self.tx[i] = reg::DIGIT0 + digit as u8;
                self.tx[i + 1] = *row;
            }
            self.spi.write(&self.tx[..len]).map_err(Max7219Error::Spi)?;

            // Shadow mirrors device contents
            for (position, row) in rows[..self.devices].iter().enumerate() {
                self.shadow[position][digit] = *row;
            }
        }
        Ok(())
    }

    /// Release the SPI device
    pub fn release(self) -> SPI {
        self.spi
    }

    #[cfg(test)]
    pub(crate) fn spi_mut(&mut self) -> &mut SPI {
        &mut self.spi
    }

    /// Write the same register on every device
    fn write_all(&mut self, register: u8, data: u8) -> Result<(), Max7219Error<SPI::Error>> {
        let len = 2 * self.devices;
        for word in self.tx[..len].chunks_exact_mut(2) {
            word[0] = register;
            word[1] = data;
        }
        self.spi.write(&self.tx[..len]).map_err(Max7219Error::Spi)
    }

    /// Module (counted from the left) driven by chain position `position`
    fn module_at(&self, position: usize) -> usize {
        if self.reverse_order {
            self.devices - 1 - position
        } else {
            position
        }
    }

    /// Byte for digit register `digit` of `module`
    fn digit_row(&self, canvas: &Canvas, module: usize, digit: usize) -> u8 {
        let left = (module as u32 * MODULE_SIZE) as i32;
        let digit = digit as i32;
        let mut row = 0u8;
        for bit in 0..8i32 {
            // (x, y) within the module for this LED
            let (x, y) = match self.orientation {
                BlockOrientation::Deg0 => (bit, digit),
                BlockOrientation::Deg90 => (digit, 7 - bit),
                BlockOrientation::DegMinus90 => (7 - digit, bit),
            };
            if canvas.stored_pixel(left + x, y) {
                row |= 0x80 >> bit;
            }
        }
        row
    }
}
