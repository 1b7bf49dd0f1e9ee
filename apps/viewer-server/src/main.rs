use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use common::{ContentResponse, FILE_NOT_FOUND, HealthStatus};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod content;


use config::ServerConfig;
use content::{ContentError, content_response, read_content};

#[derive(Clone)]
struct ServerState {
    root_dir: Arc<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = ServerConfig::from_env()?;

    if !config.public_dir.is_dir() {
        warn!(
            public_dir = %config.public_dir.display(),
            "public directory not found; static assets will 404"
        );
    }

    let app = build_router(&config);

    info!(
        bind_addr = %config.bind_addr,
        root_dir = %config.root_dir.display(),
        public_dir = %config.public_dir.display(),
        "viewer server listening"
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(config: &ServerConfig) -> Router {
    let state = ServerState {
        root_dir: Arc::new(config.root_dir.clone()),
    };

    Router::new()
        .route("/health", get(health))
        .route("/api/config/{file}", get(get_config_file))
        .fallback_service(ServeDir::new(&config.public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        role: "viewer-server".to_string(),
        online: true,
    })
}

async fn get_config_file(
    State(state): State<ServerState>,
    file: Result<Path<String>, PathRejection>,
) -> Response {
    let file = match file {
        Ok(Path(file)) => file,
        Err(rejection) => {
            debug!(error = %rejection, "rejected file key");
            return no_cache_json(
                StatusCode::NOT_FOUND,
                ContentResponse::error(FILE_NOT_FOUND),
            );
        }
    };

    let result = read_content(&state.root_dir, &file).await;

    let status = match &result {
        Ok(text) => {
            debug!(key = %file, bytes = text.len(), "served file");
            StatusCode::OK
        }
        Err(ContentError::UnknownKey(_)) => {
            debug!(key = %file, "unknown file key");
            StatusCode::NOT_FOUND
        }
        Err(err @ ContentError::Unreadable { .. }) => {
            warn!(key = %file, error = %err, "failed to read file");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    no_cache_json(status, content_response(result))
}

fn no_cache_json(status: StatusCode, body: ContentResponse) -> Response {
    (status, [(header::CACHE_CONTROL, "no-cache")], Json(body)).into_response()
}
