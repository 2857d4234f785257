//! Presentation vocabulary shared by every view.
//!
//! These are semantic styles. How a style looks (a terminal colour, a CSS
//! class) is up to the renderer.

/// Style of one piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextStyle {
    Plain,
    /// Running late.
    Warning,
    /// Running early.
    Positive,
    /// Actual track matches the scheduled one.
    TrackUnchanged,
    /// Actual track differs from the scheduled one, or none was scheduled.
    TrackChanged,
    /// Actual time more than 30 seconds after schedule.
    Late,
    OnTime,
    /// Scheduled time shifted by the current delay.
    Estimated,
}

impl TextStyle {
    /// Stable lowercase name, used in JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            TextStyle::Plain => "plain",
            TextStyle::Warning => "warning",
            TextStyle::Positive => "positive",
            TextStyle::TrackUnchanged => "track_unchanged",
            TextStyle::TrackChanged => "track_changed",
            TextStyle::Late => "late",
            TextStyle::OnTime => "on_time",
            TextStyle::Estimated => "estimated",
        }
    }
}

/// Text paired with its style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledText {
    pub text: String,
    pub style: TextStyle,
}

impl StyledText {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, TextStyle::Plain)
    }

    pub fn empty() -> Self {
        Self::plain("")
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Visual weight of a whole row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowStyle {
    Plain,
    /// The train has fully passed this point.
    Dimmed,
    /// The train is standing at this stop.
    Bold,
}

impl RowStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            RowStyle::Plain => "plain",
            RowStyle::Dimmed => "dimmed",
            RowStyle::Bold => "bold",
        }
    }
}
