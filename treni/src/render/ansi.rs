//! ANSI escape sequences for the terminal views.

use crate::presentation::{RowStyle, StyledText, TextStyle};

pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
/// Ends both bold and dim.
pub const NORMAL: &str = "\x1b[22m";

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const MAGENTA: &str = "\x1b[35m";
const DEFAULT_FG: &str = "\x1b[39m";

fn foreground(style: TextStyle) -> Option<&'static str> {
    match style {
        TextStyle::Plain => None,
        TextStyle::Warning | TextStyle::Late => Some(RED),
        TextStyle::Positive | TextStyle::OnTime => Some(GREEN),
        TextStyle::TrackUnchanged => Some(BLUE),
        TextStyle::TrackChanged => Some(MAGENTA),
        TextStyle::Estimated => Some(YELLOW),
    }
}

/// Colour a styled text for the terminal.
pub fn paint(styled: &StyledText) -> String {
    match foreground(styled.style) {
        Some(code) if !styled.is_empty() => format!("{code}{}{DEFAULT_FG}", styled.text),
        _ => styled.text.clone(),
    }
}

/// Apply a row weight to already-painted text.
pub fn weigh(text: &str, style: RowStyle) -> String {
    match style {
        RowStyle::Plain => text.to_string(),
        RowStyle::Dimmed => format!("{DIM}{text}{NORMAL}"),
        RowStyle::Bold => format!("{BOLD}{text}{NORMAL}"),
    }
}

pub fn bold(text: &str) -> String {
    weigh(text, RowStyle::Bold)
}

pub fn dim(text: &str) -> String {
    weigh(text, RowStyle::Dimmed)
}

/// Yellow text, for rows built without real-time data.
///
/// Spans painted inside keep their own colour.
pub fn yellow(text: &str) -> String {
    format!("{YELLOW}{}{DEFAULT_FG}", text.replace(DEFAULT_FG, YELLOW))
}

/// Remove escape sequences.
pub fn strip(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // CSI: ESC [ params final-byte
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Number of terminal columns `text` occupies.
pub fn visible_width(text: &str) -> usize {
    strip(text).chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paint_by_style() {
        assert_eq!(
            paint(&StyledText::new("+5", TextStyle::Warning)),
            "\x1b[31m+5\x1b[39m"
        );
        assert_eq!(paint(&StyledText::plain("On time")), "On time");
        assert_eq!(paint(&StyledText::new("", TextStyle::Late)), "");
    }

    #[test]
    fn weigh_rows() {
        assert_eq!(weigh("x", RowStyle::Plain), "x");
        assert_eq!(weigh("x", RowStyle::Dimmed), "\x1b[2mx\x1b[22m");
        assert_eq!(bold("x"), "\x1b[1mx\x1b[22m");
    }

    #[test]
    fn yellow_survives_inner_colour() {
        let inner = paint(&StyledText::new("3", TextStyle::TrackChanged));
        let text = yellow(&format!("track {inner} ok"));
        assert_eq!(text, "\x1b[33mtrack \x1b[35m3\x1b[33m ok\x1b[39m");
    }

    #[test]
    fn width_ignores_escapes() {
        let text = bold(&paint(&StyledText::new("12", TextStyle::OnTime)));
        assert_eq!(strip(&text), "12");
        assert_eq!(visible_width(&text), 2);
        assert_eq!(visible_width("Milano · 5"), 10);
    }
}
