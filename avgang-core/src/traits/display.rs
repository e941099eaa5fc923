//! Display and text-metrics traits for the marquee
//!
//! The scroll controller only needs to know how wide a string renders
//! ([`TextWidth`]). Presenting frames needs a backend that can clear and draw
//! inside a frame scope ([`MarqueeBackend`]), and the device lifecycle
//! (brightness, blanking) sits behind [`DisplayDevice`].

/// Errors that can occur when talking to the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus transfer to the display failed
    Bus,
    /// Configuration the hardware cannot honour
    InvalidConfig,
    /// Draw or commit outside a frame
    NoFrame,
}

/// Errors from a fallible text measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MetricsError {
    /// Font has no glyph data for part of the text
    MissingGlyph,
    /// Font could not be consulted
    Unavailable,
}

/// Per-character width used when a measurement is not available
pub const FALLBACK_CHAR_WIDTH: u32 = 6;

/// Infallible width measurement in pixel columns
///
/// Must be deterministic and return 0 for empty text.
pub trait TextWidth {
    fn text_width(&self, text: &str) -> u32;
}

/// Fallible width measurement
pub trait TextMetrics {
    fn measure(&self, text: &str) -> Result<u32, MetricsError>;
}

/// Rough width of `text` at `char_width` pixels per character
pub fn estimate_width(text: &str, char_width: u32) -> u32 {
    let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
    chars.saturating_mul(char_width)
}

/// Adapter that turns a fallible [`TextMetrics`] into a [`TextWidth`]
///
/// A failed measurement is replaced by [`estimate_width`] so the marquee
/// keeps running with an approximate width.
#[derive(Debug, Clone)]
pub struct WithFallback<M> {
    metrics: M,
    char_width: u32,
}

impl<M: TextMetrics> WithFallback<M> {
    pub fn new(metrics: M) -> Self {
        Self::with_char_width(metrics, FALLBACK_CHAR_WIDTH)
    }

    pub fn with_char_width(metrics: M, char_width: u32) -> Self {
        Self {
            metrics,
            char_width,
        }
    }

    pub fn inner(&self) -> &M {
        &self.metrics
    }

    pub fn inner_mut(&mut self) -> &mut M {
        &mut self.metrics
    }
}

impl<M: TextMetrics> TextWidth for WithFallback<M> {
    fn text_width(&self, text: &str) -> u32 {
        if text.is_empty() {
            return 0;
        }
        self.metrics
            .measure(text)
            .unwrap_or_else(|_| estimate_width(text, self.char_width))
    }
}

/// Rendering backend for the marquee
///
/// Drawing happens inside a frame: `begin_frame`, then any number of
/// `clear`/`draw_text` calls, then `commit` which makes the frame visible.
/// Callers commit on every path, including after a failed draw.
pub trait MarqueeBackend: TextWidth {
    /// Start a new frame
    fn begin_frame(&mut self) -> Result<(), DisplayError>;

    /// Clear the frame being built
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Draw `text` with its left edge at column `x` (may be negative)
    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> Result<(), DisplayError>;

    /// Push the frame to the display
    fn commit(&mut self) -> Result<(), DisplayError>;
}

/// Device lifecycle operations
pub trait DisplayDevice {
    /// Width in pixel columns. Fixed after initialisation.
    fn width(&self) -> u32;

    /// Set brightness on a 0-255 scale
    fn set_brightness(&mut self, level: u8) -> Result<(), DisplayError>;

    /// Turn every pixel off immediately
    fn blank(&mut self) -> Result<(), DisplayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flaky;

    impl TextMetrics for Flaky {
        fn measure(&self, text: &str) -> Result<u32, MetricsError> {
            if text.is_ascii() {
                Ok(text.len() as u32 * 5)
            } else {
                Err(MetricsError::MissingGlyph)
            }
        }
    }

    #[test]
    fn test_estimate_width() {
        assert_eq!(estimate_width("", 6), 0);
        assert_eq!(estimate_width("abc", 6), 18);
        // Characters, not bytes
        assert_eq!(estimate_width("åäö", 6), 18);
    }

    #[test]
    fn test_fallback_used_on_error() {
        let metrics = WithFallback::new(Flaky);
        assert_eq!(metrics.text_width("abcd"), 20);
        assert_eq!(metrics.text_width("Östberg"), 7 * FALLBACK_CHAR_WIDTH);
        assert_eq!(metrics.text_width(""), 0);
    }

    #[test]
    fn test_custom_fallback_width() {
        let metrics = WithFallback::with_char_width(Flaky, 8);
        assert_eq!(metrics.text_width("ö"), 8);
        assert!(metrics.inner().measure("x").is_ok());
    }
}
