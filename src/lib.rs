use std::sync::Arc;

use axum::{middleware, Router};

pub mod client;
pub mod config;
pub mod errors;
pub mod http;
pub mod logging;
pub mod rpc;

use rpc::registry::Registry;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(registry: Registry, max_body_bytes: usize) -> Self {
        Self {
            registry: Arc::new(registry),
            max_body_bytes,
        }
    }
}

/// Builds the server router. Every path is served by the RPC endpoint;
/// verb filtering (POST only) happens inside the handler so non-POST
/// requests get the fixed 405 instead of axum's default fallback.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .fallback(http::handlers::rpc_endpoint)
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
