//! Web server for exploring the scraped movie dataset.
//!
//! Provides a dashboard of the fixed aggregation views and an interactive
//! filter page. Every request re-reads the full table and re-runs the
//! aggregation pipeline synchronously; there is no incremental recompute.

mod handlers;
mod routes;
mod template_structs;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Settings;
use crate::repository::MovieRepository;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<MovieRepository>,
}

impl AppState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            repo: Arc::new(MovieRepository::new(settings.create_pool())),
        }
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
