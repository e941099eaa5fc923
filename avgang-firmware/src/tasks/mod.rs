//! Embassy async tasks
//!
//! Each task runs independently and communicates via signals.

pub mod button;
pub mod marquee;
pub mod message_rx;

pub use button::button_task;
pub use marquee::{marquee_task, Display};
pub use message_rx::message_rx_task;
