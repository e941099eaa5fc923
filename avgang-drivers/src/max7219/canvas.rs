//! Frame buffer for a chain of 8x8 modules
//!
//! One byte per pixel column, bit 0 is the top row. Drawing goes through
//! `embedded-graphics`; whole-display rotation is applied as pixels land so
//! the buffer always holds the physical layout.

use core::convert::Infallible;

use avgang_core::config::{DisplayConfig, Rotation, MAX_CASCADED, MODULE_SIZE};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

/// Widest supported display in pixel columns
pub const MAX_COLUMNS: usize = MAX_CASCADED as usize * MODULE_SIZE as usize;

const HEIGHT: i32 = MODULE_SIZE as i32;

/// 1-bit frame buffer
#[derive(Debug, Clone)]
pub struct Canvas {
    width: i32,
    rotation: Rotation,
    columns: [u8; MAX_COLUMNS],
}

impl Canvas {
    pub fn new(config: &DisplayConfig) -> Self {
        let width = config.width().min(MAX_COLUMNS as u32) as i32;
        Self {
            width,
            rotation: config.rotate,
            columns: [0; MAX_COLUMNS],
        }
    }

    pub fn width(&self) -> u32 {
        self.width as u32
    }

    /// Turn every pixel off
    pub fn clear(&mut self) {
        self.columns.fill(0);
    }

    /// Check if any pixel is lit
    pub fn is_blank(&self) -> bool {
        self.columns[..self.width as usize].iter().all(|&c| c == 0)
    }

    /// Pixel as seen by the viewer
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        let (x, y) = self.physical(x, y);
        self.stored_pixel(x, y)
    }

    /// Pixel in hardware layout, before rotation
    pub(crate) fn stored_pixel(&self, x: i32, y: i32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        self.columns[x as usize] & (1 << y) != 0
    }

    fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        let (x, y) = self.physical(x, y);
        if !self.in_bounds(x, y) {
            return;
        }
        let mask = 1u8 << y;
        if on {
            self.columns[x as usize] |= mask;
        } else {
            self.columns[x as usize] &= !mask;
        }
    }

    fn physical(&self, x: i32, y: i32) -> (i32, i32) {
        match self.rotation {
            Rotation::Normal => (x, y),
            Rotation::UpsideDown => (self.width - 1 - x, HEIGHT - 1 - y),
        }
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        (0..self.width).contains(&x) && (0..HEIGHT).contains(&y)
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.width as u32, HEIGHT as u32)
    }
}

impl DrawTarget for Canvas {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color.is_on());
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let fill = if color.is_on() { 0xFF } else { 0x00 };
        self.columns[..self.width as usize].fill(fill);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    fn canvas(cascaded: u8, rotate: Rotation) -> Canvas {
        Canvas::new(&DisplayConfig {
            cascaded,
            rotate,
            ..DisplayConfig::default()
        })
    }

    #[test]
    fn test_size() {
        let canvas = canvas(4, Rotation::Normal);
        assert_eq!(canvas.size(), Size::new(32, 8));
        assert!(canvas.is_blank());
    }

    #[test]
    fn test_out_of_bounds_clipped() {
        let mut canvas = canvas(1, Rotation::Normal);
        Rectangle::new(Point::new(-4, -4), Size::new(20, 20))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut canvas)
            .unwrap();
        assert!((0..8).all(|x| canvas.columns[x] == 0xFF));
        assert!(canvas.columns[8..].iter().all(|&c| c == 0));
    }

    #[test]
    fn test_upside_down() {
        let mut canvas = canvas(2, Rotation::UpsideDown);
        Pixel(Point::new(0, 0), BinaryColor::On).draw(&mut canvas).unwrap();
        assert!(canvas.pixel(0, 0));
        assert!(canvas.stored_pixel(15, 7));
        assert!(!canvas.stored_pixel(0, 0));
    }

    #[test]
    fn test_clear() {
        let mut canvas = canvas(2, Rotation::Normal);
        DrawTarget::clear(&mut canvas, BinaryColor::On).unwrap();
        assert!(canvas.pixel(15, 7));
        canvas.clear();
        assert!(canvas.is_blank());
    }
}
