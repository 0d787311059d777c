//! HTTP surface: `POST /generate`, a health probe, and the browser client's
//! static assets.

use crate::generator::VariationStudio;
use crate::models::GenerateRequest;
use crate::{logi, logok, logw};
use anyhow::Result;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

const INVALID_INPUT: &str = "Invalid input format";

#[derive(Clone)]
pub struct AppState {
    pub studio: Arc<VariationStudio>,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

pub async fn health_handler() -> impl IntoResponse {
    "ok"
}

pub async fn generate_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) if !request.prompt.trim().is_empty() => request,
        Ok(_) => {
            logw("Invalid request format: empty prompt");
            return error_response(StatusCode::BAD_REQUEST, INVALID_INPUT);
        }
        Err(rejection) => {
            logw(format!("Invalid request format: {}", rejection.body_text()));
            return error_response(StatusCode::BAD_REQUEST, INVALID_INPUT);
        }
    };

    logi(format!(
        "Received request: prompt={:?} generate_videos={}",
        request.prompt, request.generate_videos
    ));
    match state.studio.run(&request).await {
        Ok(bundle) => {
            logok("Sending successful response");
            (StatusCode::OK, Json(bundle)).into_response()
        }
        Err(err) => {
            logw(format!("Request processing error: {}", err));
            error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

/// Builds the router. Static assets are served from `static_dir` only when
/// that directory exists.
pub fn router(studio: Arc<VariationStudio>, static_dir: Option<&Path>) -> Router {
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/generate", post(generate_handler))
        .with_state(AppState { studio });

    let app = match static_dir {
        Some(dir) if dir.is_dir() => app.fallback_service(ServeDir::new(dir)),
        Some(dir) => {
            logw(format!(
                "Static directory {} not found; serving API only",
                dir.display()
            ));
            app
        }
        None => app,
    };

    app.layer(TraceLayer::new_for_http())
}

pub async fn serve(app: Router, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind HTTP listener on {}: {}", addr, e))?;
    logok(format!("Server running on http://localhost:{}", port));
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))?;
    Ok(())
}
