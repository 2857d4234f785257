//! Presentation state classification.
//!
//! Turns a train's progress (or the lack of it) into what a board row or
//! a stop line should say and how heavy it should look. Rendering is not
//! done here; see [`crate::render`] for the terminal and [`crate::web`]
//! for JSON.

mod row;
mod rules;
mod style;

pub use row::{
    RowPresentation, StopPresentation, approximate, build_row_presentation, classify,
    present_stop,
};
pub use rules::{delay_rule, row_style_rule, time_display, track_rule};
pub use style::{RowStyle, StyledText, TextStyle};
