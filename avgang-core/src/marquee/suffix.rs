//! Time-suffix detection
//!
//! Departure messages usually end with when the bus leaves: `"3 min"`,
//! `"Nu"` (now), a clock time like `"14:05"`, or a bare number of minutes.
//! A message with such a suffix holds it visible at the right edge instead
//! of scrolling it away.
//!
//! Matching is anchored at the end of the (right-trimmed) message and works on
//! whitespace-delimited tokens, checked in this order:
//!
//! 1. `<integer> min` (also `<integer>min`)
//! 2. the literal `Nu`
//! 3. `H:MM` or `HH:MM`
//! 4. a bare trailing integer

/// Kind of time suffix found at the end of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SuffixKind {
    /// Countdown in minutes, e.g. `3 min`
    Minutes,
    /// Departing now (`Nu`)
    Now,
    /// Wall-clock departure time, e.g. `14:05`
    Clock,
    /// Bare number, e.g. `12`
    Number,
}

/// A time suffix located inside a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSuffix<'a> {
    /// What kind of suffix this is
    pub kind: SuffixKind,
    /// Byte offset of the suffix within the message
    pub start: usize,
    /// The suffix text
    pub text: &'a str,
}

/// Find the time suffix at the end of `message`, if any
pub fn find_time_suffix(message: &str) -> Option<TimeSuffix<'_>> {
    let trimmed = message.trim_end();
    let (start, token) = last_token(trimmed)?;

    let found = |kind, start: usize| TimeSuffix {
        kind,
        start,
        text: &trimmed[start..],
    };

    if token == "min" {
        // "<integer> min": the integer is the token before
        let head = trimmed[..start].trim_end();
        return match last_token(head) {
            Some((num_start, num)) if is_integer(num) => Some(found(SuffixKind::Minutes, num_start)),
            _ => None,
        };
    }

    if let Some(num) = token.strip_suffix("min") {
        if is_integer(num) {
            return Some(found(SuffixKind::Minutes, start));
        }
    }

    if token == "Nu" {
        return Some(found(SuffixKind::Now, start));
    }

    if is_clock(token) {
        return Some(found(SuffixKind::Clock, start));
    }

    if is_integer(token) {
        return Some(found(SuffixKind::Number, start));
    }

    None
}

/// Last whitespace-delimited token and its byte offset
fn last_token(s: &str) -> Option<(usize, &str)> {
    if s.is_empty() {
        return None;
    }
    let start = s
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let token = &s[start..];
    if token.is_empty() {
        None
    } else {
        Some((start, token))
    }
}

fn is_integer(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// `H:MM` or `HH:MM`
fn is_clock(s: &str) -> bool {
    match s.split_once(':') {
        Some((hours, minutes)) => {
            (1..=2).contains(&hours.len())
                && is_integer(hours)
                && minutes.len() == 2
                && is_integer(minutes)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suffix(message: &str) -> Option<&str> {
        find_time_suffix(message).map(|s| s.text)
    }

    #[test]
    fn test_minutes() {
        let found = find_time_suffix("134 Östberghöjden 3 min").unwrap();
        assert_eq!(found.kind, SuffixKind::Minutes);
        assert_eq!(found.text, "3 min");

        assert_eq!(suffix("3 min"), Some("3 min"));
        assert_eq!(find_time_suffix("3 min").unwrap().start, 0);
        assert_eq!(suffix("Bus 4 12min"), Some("12min"));
    }

    #[test]
    fn test_min_without_number_is_not_a_suffix() {
        assert_eq!(suffix("Wait a min"), None);
        assert_eq!(suffix("min"), None);
    }

    #[test]
    fn test_now() {
        let found = find_time_suffix("Arriving Nu").unwrap();
        assert_eq!(found.kind, SuffixKind::Now);
        assert_eq!(found.text, "Nu");
        // Must be a whole token
        assert_eq!(suffix("Menu"), None);
    }

    #[test]
    fn test_clock() {
        assert_eq!(suffix("14:05"), Some("14:05"));
        assert_eq!(suffix("Line 4 dep 9:30"), Some("9:30"));
        assert_eq!(find_time_suffix("9:30").unwrap().kind, SuffixKind::Clock);
        assert_eq!(suffix("at 123:45"), None);
        assert_eq!(suffix("at 12:5"), None);
    }

    #[test]
    fn test_bare_integer() {
        let found = find_time_suffix("Line 134").unwrap();
        assert_eq!(found.kind, SuffixKind::Number);
        assert_eq!(found.text, "134");
    }

    #[test]
    fn test_no_suffix() {
        assert_eq!(suffix("Hello"), None);
        assert_eq!(suffix(""), None);
        assert_eq!(suffix("   "), None);
        assert_eq!(suffix("Hello2"), None);
    }

    #[test]
    fn test_trailing_whitespace_ignored() {
        let found = find_time_suffix("Slussen 5 min  ").unwrap();
        assert_eq!(found.text, "5 min");
        assert_eq!(found.start, 8);
    }
}
