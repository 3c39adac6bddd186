//! Frontdesk API crate - the HTTP surface.
//!
//! Thin request/response mapping over the engines: handlers extract and
//! validate parameters, call one engine operation, and serialize the
//! result. All business rules live below this layer.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::{create_router, start_server};
pub use state::AppState;
