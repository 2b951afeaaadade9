use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::models::AnalysisResponse;
use crate::services::Analyzer;

pub struct AppState {
    pub analyzer: Analyzer,
}

/// First value of a repeated query parameter.
fn first_param<'a>(params: &'a [(String, String)], name: &str) -> &'a str {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
        .unwrap_or_default()
}

/// GET /api/analyze?chain=<id>&mint=<address>
async fn analyze(
    State(state): State<Arc<AppState>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
    let output = match query {
        Ok(Query(params)) => {
            state
                .analyzer
                .analyze(first_param(&params, "chain"), first_param(&params, "mint"))
                .await
        }
        Err(rejection) => {
            tracing::debug!("Rejected query string: {}", rejection);
            AnalysisResponse::error(400, "Invalid query string.", Some(rejection.body_text()))
        }
    };
    json_response(output)
}

fn json_response(output: AnalysisResponse) -> Response {
    let status = StatusCode::from_u16(output.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(header::CACHE_CONTROL, "no-store")],
        Json(output.body),
    )
        .into_response()
}

/// GET /health
async fn health() -> &'static str {
    "OK"
}

/// API routes plus the static front-end as fallback.
pub fn create_rest_router(state: Arc<AppState>, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/api/analyze", get(analyze))
        .route("/health", get(health))
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
