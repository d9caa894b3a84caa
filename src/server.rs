//! HTTP routes for the embed service.

use std::future::Future;
use std::io;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{error, warn};

use crate::error::ResolveError;
use crate::lookup::StatusLookup;
use crate::template::render_embed;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub lookup: StatusLookup,
    /// Prefix for stylesheet, background and fallback icon URLs.
    pub base_url: Arc<str>,
}

impl AppState {
    pub fn new(lookup: StatusLookup, base_url: impl Into<Arc<str>>) -> Self {
        Self {
            lookup,
            base_url: base_url.into(),
        }
    }
}

/// Failure of a request, as reported to the client.
#[derive(Debug)]
pub enum ApiError {
    /// The address was rejected; the message is safe to show.
    BadRequest(ResolveError),
    /// Anything else. Only logged; the client gets a generic message.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::BadRequest(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Internal(detail) => {
                error!(%detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/server/:address/embed", get(embed))
        .route("/v1/server/:address/image", get(image))
        .with_state(state)
}

/// Serve `router(state)` on `listener` until `shutdown` completes.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn embed(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Html<String>, ApiError> {
    // The lookup runs in its own task so a panicking fetcher surfaces as a
    // 500 instead of tearing down the connection.
    let lookup = state.lookup.clone();
    let raw = address.clone();
    let snapshot = tokio::spawn(async move { lookup.lookup(&raw).await })
        .await
        .map_err(|e| ApiError::Internal(format!("lookup task for {} failed: {}", address, e)))?
        .map_err(|e| {
            warn!(%address, error = %e, "invalid request for server");
            ApiError::BadRequest(e)
        })?;

    Ok(Html(render_embed(&address, &snapshot, &state.base_url)))
}

async fn image(Path(address): Path<String>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "not_implemented",
        "message": "Image generation endpoint coming soon",
        "server": address,
    }))
}
