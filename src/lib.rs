pub mod audit;
pub mod config;
pub mod error;
pub mod observability;
pub mod pipeline;
pub mod rate_limit;
pub mod routes;
pub mod server;

pub use config::Config;
pub use error::SubmissionError;
pub use pipeline::{DispatchResult, FormPipeline};
pub use routes::AppState;

/// Create app router for testing
///
/// Same routes and CORS handling as the server, without the trace layer or
/// a bound listener.
pub fn create_app(state: AppState) -> axum::Router {
    routes::router(state)
}
