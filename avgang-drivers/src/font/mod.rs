//! Text rendering with a fixed-width Latin-1 font
//!
//! Uses the 5x8 ISO 8859-1 font from `embedded-graphics`, which fills the
//! full height of a single module row.

pub mod charset;

use avgang_core::traits::{MetricsError, TextMetrics};
use embedded_graphics::mono_font::iso_8859_1::FONT_5X8;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::renderer::TextRenderer;
use embedded_graphics::text::{Baseline, Text};

pub use charset::{fold_char, fold_text, has_glyph};

/// Font used on the matrix
pub const MATRIX_FONT: &MonoFont<'static> = &FONT_5X8;

/// Lit pixels in the font colour
pub const TEXT_STYLE: MonoTextStyle<'static, BinaryColor> =
    MonoTextStyle::new(MATRIX_FONT, BinaryColor::On);

/// Horizontal advance per character in pixels
pub fn char_advance() -> u32 {
    MATRIX_FONT.character_size.width + MATRIX_FONT.character_spacing
}

/// Measures and draws text in [`MATRIX_FONT`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MatrixFont;

impl MatrixFont {
    /// Width of `text` once folded, in pixel columns
    pub fn width(&self, text: &str) -> u32 {
        if text.is_empty() {
            return 0;
        }
        let folded = fold_text(text);
        let metrics = TEXT_STYLE.measure_string(&folded, Point::zero(), Baseline::Top);
        metrics.next_position.x.max(0) as u32
    }

    /// Draw `text` with its top-left corner at (`x`, `y`)
    ///
    /// Returns the column just right of the last character.
    pub fn draw<D>(&self, target: &mut D, text: &str, x: i32, y: i32) -> Result<i32, D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let folded = fold_text(text);
        let next = Text::with_baseline(&folded, Point::new(x, y), TEXT_STYLE, Baseline::Top)
            .draw(target)?;
        Ok(next.x)
    }
}

impl TextMetrics for MatrixFont {
    /// Fails when part of the text has no glyph and would be substituted
    fn measure(&self, text: &str) -> Result<u32, MetricsError> {
        if !charset::fully_supported(text) {
            return Err(MetricsError::MissingGlyph);
        }
        Ok(self.width(text))
    }
}
