//! API server initialization

use std::net::SocketAddr;

use anyhow::Result;
use axum::Router;
use axum::response::Redirect;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::openapi::{openapi_json, swagger_ui_html};
use super::routes::{health, movies, search, stats};
use super::types::ApiError;
use crate::app::CoreApp;

pub struct ApiServer {
    app: CoreApp,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        Self { app }
    }

    /// Returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let Self { app } = self;

        let shutdown = app.shutdown.clone();
        let host = app.config.server.host.clone();
        let port = app.config.server.port;
        let addr = SocketAddr::new(host.parse()?, port);

        let catalog_routes = search::routes(app.catalog.clone())
            .merge(movies::routes(app.catalog.clone()))
            .merge(stats::routes(app.catalog.clone()));

        let router = Router::new()
            .route("/", get(|| async { Redirect::temporary("/api/docs") }))
            .route("/api/v1/health", get(health::health))
            .route("/api/openapi.json", get(openapi_json))
            .route("/api/docs", get(swagger_ui_html))
            .route("/api/docs/", get(swagger_ui_html))
            .nest("/api/v1", catalog_routes)
            .fallback(handle_404)
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            // Read-only public data, no credentialed requests to protect
            .layer(CorsLayer::permissive());

        let listener = TcpListener::bind(addr).await?;
        tracing::info!("API server listening on http://{addr}");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        Ok(app)
    }
}

async fn handle_404() -> ApiError {
    ApiError::not_found("NOT_FOUND", "Resource not found")
}
