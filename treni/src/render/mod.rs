//! Terminal output.
//!
//! Everything here writes to an [`std::io::Write`], so the views are
//! tested against a byte buffer with the escapes stripped.

pub mod ansi;
mod table;
mod views;

pub use table::Table;
pub use views::{
    format_duration, progress_bar, render_board, render_progress, render_solutions, render_stats,
};
