//! The message currently on the marquee

use heapless::String;

use super::suffix::{find_time_suffix, SuffixKind};

pub use avgang_protocol::MAX_LINE_LEN as MAX_MESSAGE_LEN;

/// Owned message text
pub type MessageText = String<MAX_MESSAGE_LEN>;

/// An accepted message with its measured width
///
/// Immutable once built; replaced wholesale when a new message arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    text: MessageText,
    pixel_width: u32,
    /// Byte offset and kind of the time suffix, if one was found
    suffix: Option<(usize, SuffixKind)>,
}

impl Default for Message {
    fn default() -> Self {
        Self::blank()
    }
}

impl Message {
    /// The empty message shown while idle
    pub const fn blank() -> Self {
        Self {
            text: String::new(),
            pixel_width: 0,
            suffix: None,
        }
    }

    /// Build a message from text and its rendered width in pixels
    pub fn new(text: MessageText, pixel_width: u32) -> Self {
        let suffix = find_time_suffix(&text).map(|s| (s.start, s.kind));
        Self {
            text,
            pixel_width,
            suffix,
        }
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub fn pixel_width(&self) -> u32 {
        self.pixel_width
    }

    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }

    /// The trailing time token, e.g. `"3 min"`
    pub fn time_suffix(&self) -> Option<&str> {
        self.suffix
            .map(|(start, _)| self.text[start..].trim_end())
    }

    pub fn suffix_kind(&self) -> Option<SuffixKind> {
        self.suffix.map(|(_, kind)| kind)
    }

    /// Whether this message pins its suffix at the right edge on a display
    /// `display_width` pixels wide
    ///
    /// Messages that already fit never pause; they scroll through and off.
    pub fn pauses_on(&self, display_width: u32) -> bool {
        self.suffix.is_some() && self.pixel_width > display_width
    }
}

/// Copy `text` into message storage, cutting on a character boundary if it
/// does not fit
pub fn message_text(text: &str) -> MessageText {
    let mut owned = MessageText::new();
    for ch in text.chars() {
        if owned.push(ch).is_err() {
            break;
        }
    }
    owned
}

#[cfg(feature = "defmt")]
impl defmt::Format for Message {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Message({=str}, {}px, suffix={:?})",
            self.text.as_str(),
            self.pixel_width,
            self.time_suffix()
        );
    }
}
