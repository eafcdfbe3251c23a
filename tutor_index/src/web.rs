//! HTTP interface for decklist front-ends
//!
//! Serves the persisted reverse index and ranks tutors for pasted decklists.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::decklist::{resolve_decklist, TutorCoverage};
use crate::error::{Error, Result};
use crate::index::ReverseIndex;

/// Shared application state (read-only index + its serialized form)
#[derive(Clone)]
struct AppState {
    index: Arc<ReverseIndex>,
    index_json: Arc<String>,
}

/// API response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// GET /api/tutored-by-map
async fn index_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        state.index_json.as_str().to_owned(),
    )
}

/// POST /api/decklist (plain-text body)
async fn decklist_handler(
    State(state): State<AppState>,
    body: String,
) -> Json<ApiResponse<Vec<TutorCoverage>>> {
    if body.trim().is_empty() {
        return Json(ApiResponse::error("Please paste a decklist."));
    }

    let ranked = resolve_decklist(&body, state.index.as_ref());
    log::info!("Ranked {} tutors for submitted decklist", ranked.len());
    Json(ApiResponse::ok(ranked))
}

/// Build the web server router
pub fn create_router(index: Arc<ReverseIndex>) -> Result<Router> {
    let index_json = Arc::new(serde_json::to_string(index.as_ref())?);
    let state = AppState { index, index_json };

    Ok(Router::new()
        .route("/api/tutored-by-map", get(index_handler))
        .route("/api/decklist", post(decklist_handler))
        .layer(CorsLayer::permissive())
        .with_state(state))
}

/// Start the web server, stopping on Ctrl-C
pub async fn serve(index: ReverseIndex, port: u16) -> Result<()> {
    let app = create_router(Arc::new(index))?;
    let addr = format!("0.0.0.0:{}", port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("Web API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::warn!("Failed to listen for shutdown signal: {}", e);
            }
            log::info!("Shutting down web server");
        })
        .await
        .map_err(|e| Error::Server(e.to_string()))
}
