//! Inter-task communication channels
//!
//! Defines the statics shared between Embassy tasks. Uses embassy-sync
//! primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicU32, Ordering};

use avgang_protocol::LineText;

/// Why the marquee loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum ShutdownReason {
    /// Producer sent the end-of-stream byte
    EndOfStream,
    /// UART reported an error; treated as end of stream
    InputFault,
    /// Shutdown button held
    Button,
}

/// Latest received message not yet picked up by the marquee
///
/// Single slot: a newer message overwrites one that was never shown.
pub static PENDING_MESSAGE: Signal<CriticalSectionRawMutex, LineText> = Signal::new();

/// Request to stop the marquee loop
pub static SHUTDOWN: Signal<CriticalSectionRawMutex, ShutdownReason> = Signal::new();

/// Messages overwritten in `PENDING_MESSAGE` before the marquee took them
pub static SUPERSEDED_MESSAGES: AtomicU32 = AtomicU32::new(0);

/// Publish a received message for the marquee
pub fn publish_message(text: LineText) {
    if PENDING_MESSAGE.signaled() {
        let total = SUPERSEDED_MESSAGES.fetch_add(1, Ordering::Relaxed) + 1;
        defmt::debug!("Pending message superseded ({} total)", total);
    }
    PENDING_MESSAGE.signal(text);
}
