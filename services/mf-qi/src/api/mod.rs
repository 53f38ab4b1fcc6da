//! API layer - JSON over HTTP

mod error;
mod extract;
mod routes;

pub use error::ApiError;
pub use extract::{ApiJson, RowIdPath};
pub use routes::{AppState, router};
