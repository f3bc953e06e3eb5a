//! # hnews API Server
//!
//! Serves Hacker News story listings as simplified JSON, backed by a
//! short-lived in-memory cache.
//!
//! ## Endpoints
//!
//! - `GET /health` - Liveness and cache occupancy
//! - `GET /api/stories` - Top stories
//! - `GET /api/stories/:type` - Stories by type (`top`, `show`, `ask`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use hnews_api::{ApiServer, ApiConfig};
//!
//! let server = ApiServer::new(ApiConfig::from_env())?;
//! server.run(([0, 0, 0, 0], 8080)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod dto;
mod error;
mod handlers;
mod routes;
mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{ApiConfig, AppState};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use hnews_core::error::Result;

/// API server for hnews.
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a new API server with the given configuration.
    ///
    /// The story cache is created here and lives as long as the server.
    pub fn new(config: ApiConfig) -> Result<Self> {
        Ok(Self {
            state: Arc::new(AppState::new(config)?),
        })
    }

    /// Creates the router with all routes and layers configured.
    pub fn router(&self) -> Router {
        with_layers(create_router(self.state.clone()))
    }

    /// Runs the server on the given address.
    pub async fn run(self, addr: impl Into<SocketAddr>) -> std::io::Result<()> {
        let addr = addr.into();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!("hnews API server listening on {}", addr);

        axum::serve(listener, self.router()).await
    }
}

/// Wraps a router with CORS and request tracing.
pub fn with_layers(router: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE]);

    router.layer(cors).layer(TraceLayer::new_for_http())
}
