//! Hardware abstraction traits
//!
//! These traits define the interface between the marquee logic and the
//! display driver.

pub mod display;

pub use display::{
    estimate_width, DisplayDevice, DisplayError, MarqueeBackend, MetricsError, TextMetrics,
    TextWidth, WithFallback, FALLBACK_CHAR_WIDTH,
};
