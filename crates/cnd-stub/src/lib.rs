//! # cnd-stub -- In-memory certificate service
//!
//! Serves the REST API that `cnd-client` consumes, backed by process memory:
//! record CRUD, all-or-nothing bulk deletion, document download and audit
//! history. Used for local development of the panel and by the integration
//! tests, which mount [`app`] on an ephemeral port.
//!
//! Storage is in-memory with no persistence; data is lost on restart.

pub mod config;
pub mod routes;
pub mod seed;
pub mod store;

pub use config::StubConfig;
pub use store::AppState;

use axum::Router;
use tower_http::trace::TraceLayer;

/// The stub router with request tracing.
pub fn app(state: AppState) -> Router {
    routes::router(state).layer(TraceLayer::new_for_http())
}

/// A store pre-loaded with the demo records.
pub fn seeded_state() -> AppState {
    let state = AppState::new();
    seed::seed(&state);
    state
}
