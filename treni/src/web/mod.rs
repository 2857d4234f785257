//! HTTP wrapper around the ViaggiaTreno client.
//!
//! JSON endpoints for station search, boards, train lookup and progress,
//! plus static files for a web front end.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
