//! Web layer for the station dispatch server.
//!
//! Provides the optimization endpoint and the dashboard read
//! endpoints.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
