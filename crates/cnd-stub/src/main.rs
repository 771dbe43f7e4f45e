//! Certificate service stub server.
//!
//! Settings come from the environment (see [`cnd_stub::StubConfig`]); log
//! filtering follows `RUST_LOG` and defaults to `info`.

use std::net::SocketAddr;

use cnd_stub::{AppState, StubConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = StubConfig::from_env();
    let state = if config.seed {
        cnd_stub::seeded_state()
    } else {
        AppState::new()
    };
    let app = cnd_stub::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(seed = config.seed, "cnd-stub listening on {addr}");
    axum::serve(listener, app.into_make_service()).await
}
