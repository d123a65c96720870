pub mod app;
pub mod error;
mod routes;

pub use app::{app, run_server, AppState};
pub use error::ApiError;
