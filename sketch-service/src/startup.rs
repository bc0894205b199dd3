//! Application startup and lifecycle management.

use crate::config::SketchConfig;
use crate::handlers::{
    get_options, health_check, metrics::metrics, readiness_check, save_drawing,
};
use crate::models::GridOptions;
use crate::services::{load_recognizer, GridArtifactStore, Recognizer, SketchPipeline};
use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware, REQUEST_ID_HEADER};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: SketchPipeline,
    /// `None` lifts axum's default 2 MB cap on `/save` bodies.
    pub max_body_bytes: Option<usize>,
}

impl AppState {
    pub fn new(pipeline: SketchPipeline) -> Self {
        Self {
            pipeline,
            max_body_bytes: None,
        }
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: Option<usize>) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = match state.max_body_bytes {
        Some(bytes) => DefaultBodyLimit::max(bytes),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route("/options", get(get_options))
        .route(
            "/save",
            post(save_drawing)
                .layer::<_, std::convert::Infallible>(body_limit)
                .layer(CorsLayer::permissive()),
        )
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    http_port: u16,
    http_listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration, loading the
    /// configured recognizer. A recognizer that fails to load aborts the build.
    pub async fn build(config: SketchConfig) -> Result<Self, AppError> {
        let recognizer = load_recognizer(&config.recognizer).await?;
        Self::build_with_recognizer(config, recognizer).await
    }

    pub async fn build_with_recognizer(
        config: SketchConfig,
        recognizer: Arc<dyn Recognizer>,
    ) -> Result<Self, AppError> {
        let store = GridArtifactStore::new(config.artifact.path.clone());
        tracing::info!(path = ?store.path(), "Grid artifacts will be written here");

        let pipeline = SketchPipeline::new(GridOptions::default(), store, recognizer);
        let state = AppState::new(pipeline).with_max_body_bytes(config.request.max_body_bytes);

        // Port 0 binds a random port for testing
        let address = config.common.address();
        let http_listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let http_port = http_listener.local_addr()?.port();

        tracing::info!("Sketch service: HTTP on port {}", http_port);

        Ok(Self {
            http_port,
            http_listener,
            state,
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn http_port(&self) -> u16 {
        self.http_port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        axum::serve(self.http_listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                std::io::Error::other(format!("HTTP server error: {}", e))
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
