//! MAX7219 matrix as a marquee backend
//!
//! [`MatrixDisplay`] ties the chain driver, the frame buffer and the font
//! together and implements the core display traits.

use avgang_core::config::DisplayConfig;
use avgang_core::traits::{
    DisplayDevice, DisplayError, MarqueeBackend, TextWidth, WithFallback,
};
use embedded_hal::spi::SpiDevice;

use crate::font::{char_advance, MatrixFont};
use crate::max7219::{contrast_to_intensity, Canvas, Max7219, Max7219Error};

/// Dot-matrix display built from cascaded MAX7219 modules
pub struct MatrixDisplay<SPI> {
    driver: Max7219<SPI>,
    canvas: Canvas,
    font: WithFallback<MatrixFont>,
    brightness: u8,
    /// Between `begin_frame` and `commit`
    in_frame: bool,
}

impl<SPI> MatrixDisplay<SPI>
where
    SPI: SpiDevice,
{
    /// Bring up the chain described by `config`
    ///
    /// Leaves every LED off at the configured brightness.
    pub fn initialize(spi: SPI, config: &DisplayConfig) -> Result<Self, Max7219Error<SPI::Error>> {
        let mut driver = Max7219::new(spi, config)?;
        driver.init(contrast_to_intensity(config.brightness))?;

        Ok(Self {
            driver,
            canvas: Canvas::new(config),
            font: WithFallback::with_char_width(MatrixFont, char_advance()),
            brightness: config.brightness,
            in_frame: false,
        })
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Power the chain down and release the SPI device
    pub fn release(mut self) -> Result<SPI, Max7219Error<SPI::Error>> {
        self.driver.set_power(false)?;
        Ok(self.driver.release())
    }
}

impl<SPI> TextWidth for MatrixDisplay<SPI> {
    fn text_width(&self, text: &str) -> u32 {
        self.font.text_width(text)
    }
}

impl<SPI> MarqueeBackend for MatrixDisplay<SPI>
where
    SPI: SpiDevice,
{
    fn begin_frame(&mut self) -> Result<(), DisplayError> {
        self.in_frame = true;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        if !self.in_frame {
            return Err(DisplayError::NoFrame);
        }
        self.canvas.clear();
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> Result<(), DisplayError> {
        if !self.in_frame {
            return Err(DisplayError::NoFrame);
        }
        match self.font.inner().draw(&mut self.canvas, text, x, y) {
            Ok(_) => Ok(()),
            Err(never) => match never {},
        }
    }

    fn commit(&mut self) -> Result<(), DisplayError> {
        if !core::mem::replace(&mut self.in_frame, false) {
            return Err(DisplayError::NoFrame);
        }
        self.driver.flush(&self.canvas)?;
        Ok(())
    }
}

impl<SPI> DisplayDevice for MatrixDisplay<SPI>
where
    SPI: SpiDevice,
{
    fn width(&self) -> u32 {
        self.canvas.width()
    }

    fn set_brightness(&mut self, level: u8) -> Result<(), DisplayError> {
        self.driver.set_intensity(contrast_to_intensity(level))?;
        self.brightness = level;
        Ok(())
    }

    fn blank(&mut self) -> Result<(), DisplayError> {
        self.canvas.clear();
        self.driver.clear()?;
        Ok(())
    }
}
