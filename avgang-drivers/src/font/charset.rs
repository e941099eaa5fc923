//! Character substitution for the Latin-1 matrix font
//!
//! Departure feeds use typographic punctuation and the occasional character
//! outside Latin-1. Those are folded onto glyphs the font has, so measuring
//! and drawing always agree.

use avgang_core::marquee::MessageText;

/// Glyph drawn for characters the font cannot show
pub const REPLACEMENT: char = '?';

/// Check if the font has a glyph for `ch`
pub fn has_glyph(ch: char) -> bool {
    matches!(ch, ' '..='~' | '\u{A0}'..='\u{FF}')
}

/// Map `ch` onto a character the font can draw
pub fn fold_char(ch: char) -> char {
    if has_glyph(ch) {
        return ch;
    }
    match ch {
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => '\'',
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => '"',
        '\u{2010}'..='\u{2015}' | '\u{2212}' => '-',
        '\u{2026}' | '\u{2022}' => '.',
        '\t' | '\u{2000}'..='\u{200A}' | '\u{202F}' => ' ',
        '\u{20AC}' => 'E',
        _ => REPLACEMENT,
    }
}

/// Copy `text` with every character folded
///
/// Folded characters never need more bytes than the originals, so the
/// result holds as much text as the input.
pub fn fold_text(text: &str) -> MessageText {
    let mut folded = MessageText::new();
    for ch in text.chars() {
        if folded.push(fold_char(ch)).is_err() {
            break;
        }
    }
    folded
}

/// Check if every character has a glyph
pub fn fully_supported(text: &str) -> bool {
    text.chars().all(has_glyph)
}
