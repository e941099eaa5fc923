//! Events emitted by phase transitions

use super::machine::Phase;

/// Something that changed the marquee phase during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// A new message started scrolling, replacing whatever was in `from`
    MessageStarted { from: Phase },
    /// An empty message blanked the display
    MessageCleared { from: Phase },
    /// The time suffix reached the right edge
    PauseReached,
    /// The dwell period ended
    DwellElapsed,
    /// The message left the display on the left
    ScrolledOff,
}

impl Event {
    /// Check if this event was caused by an arriving message
    pub fn is_arrival(&self) -> bool {
        matches!(
            self,
            Event::MessageStarted { .. } | Event::MessageCleared { .. }
        )
    }

    /// Check if this event cut a running animation short
    pub fn is_interruption(&self) -> bool {
        match self {
            Event::MessageStarted { from } | Event::MessageCleared { from } => {
                *from != Phase::Idle
            }
            _ => false,
        }
    }

    /// Phase the marquee is in after this event
    pub fn target(&self) -> Phase {
        match self {
            Event::MessageStarted { .. } => Phase::Scrolling,
            Event::PauseReached => Phase::Paused,
            Event::MessageCleared { .. } | Event::DwellElapsed | Event::ScrolledOff => Phase::Idle,
        }
    }
}
