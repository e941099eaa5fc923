//! Marquee animation
//!
//! - [`suffix`]: finds the trailing departure time in a message
//! - [`machine`]: the scroll/pause state machine
//! - [`runner`]: presents controller output on a backend, once per frame

pub mod events;
pub mod machine;
pub mod message;
pub mod runner;
pub mod suffix;

pub use events::Event;
pub use machine::{Phase, RenderInstruction, ScrollController, BLANK};
pub use message::{message_text, Message, MessageText, MAX_MESSAGE_LEN};
pub use runner::{
    present, MarqueeRunner, RenderFailure, RunnerStats, StepReport, MAX_CONSECUTIVE_FAILURES,
};
pub use suffix::{find_time_suffix, SuffixKind, TimeSuffix};
