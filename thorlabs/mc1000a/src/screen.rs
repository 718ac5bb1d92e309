//! Parser for the status screen of the MC1000A.
//!
//! The MC1000A does not answer with structured data. Instead, it redraws its terminal screen and
//! the state has to be scraped from fixed positions counted from the end of that screen. All of
//! these positions are collected here, such that a firmware with a different layout only requires
//! changes in this module.

use std::fmt::Display;

use instrumentrs::InstrumentError;

/// Line that holds the rotation state, counted from the end of the screen (1 is the last line).
pub const SPIN_STATE_LINE: usize = 10;

/// Characters of the rotation state line that hold the indicator, as `(start, end)` counted from
/// the end of the line. The last character of the line is not part of the indicator.
pub const SPIN_STATE_CHARS: (usize, usize) = (4, 1);

/// The indicator that the chopper is spinning. Anything else means it is not.
pub const SPIN_ON_INDICATOR: &str = " On";

/// Line that holds the chopping rate, counted from the end of the screen.
pub const SPIN_RATE_LINE: usize = 7;

/// Characters of the rate line that hold the chopping rate in Hz, counted from the end of the
/// line.
pub const SPIN_RATE_CHARS: (usize, usize) = (5, 1);

/// Rotation state of the chopper wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinState {
    /// The chopper wheel is rotating.
    Spinning,
    /// The chopper wheel is at rest.
    Stopped,
}

impl Display for SpinState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpinState::Spinning => write!(f, "Spinning"),
            SpinState::Stopped => write!(f, "Stopped"),
        }
    }
}

impl From<&str> for SpinState {
    fn from(value: &str) -> Self {
        if value == SPIN_ON_INDICATOR {
            SpinState::Spinning
        } else {
            SpinState::Stopped
        }
    }
}

/// Parse the rotation state from a status screen.
///
/// Fails if the screen has fewer than [`SPIN_STATE_LINE`] lines.
pub fn parse_spin_state(screen: &str) -> Result<SpinState, InstrumentError> {
    let line = line_from_end(screen, SPIN_STATE_LINE)?;
    let (start, end) = SPIN_STATE_CHARS;
    Ok(SpinState::from(chars_from_end(line, start, end)))
}

/// Parse the chopping rate in Hz from a status screen.
///
/// Fails if the screen has fewer than [`SPIN_RATE_LINE`] lines or if the rate field does not hold
/// a number. Whitespace around the number is ignored.
pub fn parse_spin_rate(screen: &str) -> Result<u32, InstrumentError> {
    let line = line_from_end(screen, SPIN_RATE_LINE)?;
    let (start, end) = SPIN_RATE_CHARS;
    let field = chars_from_end(line, start, end);
    field.trim().parse().map_err(|e| {
        InstrumentError::ResponseParseError(format!(
            "Failed to parse chopping rate from field {field:?} of line {line:?}: {e}. Screen was: {screen:?}"
        ))
    })
}

/// Split a screen into lines.
///
/// Lines end at `\r\n`, `\r`, `\n`, or any of the other Unicode line boundaries. A line break at
/// the very end does not start another, empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if !is_line_boundary(ch) {
            continue;
        }
        lines.push(&text[start..idx]);
        start = idx + ch.len_utf8();
        if ch == '\r' {
            if let Some(&(next_idx, '\n')) = chars.peek() {
                chars.next();
                start = next_idx + 1;
            }
        }
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

fn is_line_boundary(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r'
            | '\u{0b}'
            | '\u{0c}'
            | '\u{1c}'
            | '\u{1d}'
            | '\u{1e}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Get the `n`th line from the end of the screen, where `1` is the last line.
fn line_from_end(screen: &str, n: usize) -> Result<&str, InstrumentError> {
    let lines = split_lines(screen);
    lines
        .len()
        .checked_sub(n)
        .and_then(|idx| lines.get(idx).copied())
        .ok_or_else(|| {
            InstrumentError::ResponseParseError(format!(
                "Status screen has {} lines, but at least {n} are required. Screen was: {screen:?}",
                lines.len()
            ))
        })
}

/// Characters from `start` to `end` counted from the end of `line`, end exclusive.
///
/// Lines that are too short yield whatever is left of the range, possibly nothing.
fn chars_from_end(line: &str, start: usize, end: usize) -> &str {
    let len = line.chars().count();
    let first = len.saturating_sub(start);
    let last = len.saturating_sub(end);
    if first >= last {
        return "";
    }
    let byte_idx = |char_idx: usize| {
        line.char_indices()
            .nth(char_idx)
            .map_or(line.len(), |(byte, _)| byte)
    };
    &line[byte_idx(first)..byte_idx(last)]
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::*;

    /// A screen with the given rotation and rate lines at their expected positions.
    fn screen(spin_line: &str, rate_line: &str) -> String {
        let mut lines = vec!["header", spin_line, "a", "b", rate_line];
        lines.extend(["c", "d", "e", "f", "g", "h"]);
        lines.join("\r\n")
    }

    #[rstest]
    #[case("a\r\nb\r\nc", vec!["a", "b", "c"])]
    #[case("a\nb\rc\r\n", vec!["a", "b", "c"])]
    #[case("a\r\n\r\nb", vec!["a", "", "b"])]
    #[case("a\u{0c}b\u{2028}c", vec!["a", "b", "c"])]
    #[case("\n", vec![""])]
    #[case("", vec![])]
    fn test_split_lines(#[case] text: &str, #[case] exp: Vec<&str>) {
        assert_eq!(split_lines(text), exp);
    }

    #[rstest]
    #[case("Enable:  On ", 4, 1, " On")]
    #[case("Enable: Off ", 4, 1, "Off")]
    #[case("Freq:  250 ", 5, 1, " 250")]
    #[case("ab", 4, 1, "a")]
    #[case("a", 4, 1, "")]
    #[case("", 4, 1, "")]
    #[case("Phase: 90° ", 4, 1, "90°")]
    fn test_chars_from_end(
        #[case] line: &str,
        #[case] start: usize,
        #[case] end: usize,
        #[case] exp: &str,
    ) {
        assert_eq!(chars_from_end(line, start, end), exp);
    }

    #[rstest]
    #[case("Enable:  On ", SpinState::Spinning)]
    #[case("Enable: Off ", SpinState::Stopped)]
    #[case("Enable:   ? ", SpinState::Stopped)]
    #[case("Enable:  On", SpinState::Stopped)]
    #[case("", SpinState::Stopped)]
    fn test_parse_spin_state(#[case] spin_line: &str, #[case] exp: SpinState) {
        let screen = screen(spin_line, "Freq:  250 ");
        assert_eq!(parse_spin_state(&screen).unwrap(), exp);
    }

    #[rstest]
    #[case("Freq:  250 ", 250)]
    #[case("Freq: 1000 ", 1000)]
    #[case("Freq:   20 ", 20)]
    #[case("20 ", 20)]
    fn test_parse_spin_rate(#[case] rate_line: &str, #[case] exp: u32) {
        let screen = screen("Enable:  On ", rate_line);
        assert_eq!(parse_spin_rate(&screen).unwrap(), exp);
    }

    #[rstest]
    #[case("Freq: abcd ")]
    #[case("Freq: ---- ")]
    #[case("")]
    fn test_parse_spin_rate_invalid(#[case] rate_line: &str) {
        let screen = screen("Enable:  On ", rate_line);
        match parse_spin_rate(&screen) {
            Err(InstrumentError::ResponseParseError(msg)) => {
                assert!(msg.contains("Screen was"));
            }
            _ => panic!("Expected ResponseParseError"),
        }
    }

    /// Too short screens are reported with the screen itself.
    #[rstest]
    fn test_short_screen() {
        let screen = "only\r\nthree\r\nlines";
        match parse_spin_state(screen) {
            Err(InstrumentError::ResponseParseError(msg)) => {
                assert!(msg.contains("has 3 lines"));
                assert!(msg.contains("only"));
            }
            _ => panic!("Expected ResponseParseError"),
        }
        assert!(parse_spin_rate(screen).is_err());
    }

    #[rstest]
    fn test_spin_state_display() {
        assert_eq!(format!("{}", SpinState::Spinning), "Spinning");
        assert_eq!(format!("{}", SpinState::Stopped), "Stopped");
    }
}
