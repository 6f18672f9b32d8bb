//! HTTP interface consumed by the browser UI.
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /` | `ok` |
//! | `GET /news` | news of the configured default source |
//! | `GET /news/{source_id}` | [`NewsResponse`](crate::models::NewsResponse) or [`ErrorResponse`] |
//! | `GET /sources` | [`SourcesResponse`] |

use crate::error::NewsError;
use crate::models::{ErrorResponse, SourceSummary, SourcesResponse};
use crate::pipeline::{Pipeline, failure_response};
use crate::translate::MyMemoryTranslator;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

pub type AppState = Arc<Pipeline<MyMemoryTranslator>>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/news", get(default_news))
        .route("/news/{source_id}", get(source_news))
        .route("/sources", get(list_sources))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(state: AppState, addr: &str) -> Result<(), NewsError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "headline_relay listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for Ctrl-C");
            }
        })
        .await?;
    Ok(())
}

async fn default_news(State(state): State<AppState>) -> Response {
    let id = state.config().default_source.clone();
    news_for(&state, &id).await
}

async fn source_news(State(state): State<AppState>, Path(source_id): Path<String>) -> Response {
    news_for(&state, &source_id).await
}

async fn news_for(state: &AppState, source_id: &str) -> Response {
    let source = match state.config().source(source_id) {
        Ok(source) => source,
        Err(e) => {
            warn!(%source_id, "Request for unknown source");
            return error_reply(StatusCode::NOT_FOUND, format!("Unknown news source: {source_id}"), &e);
        }
    };

    match state.run(source).await {
        Ok(response) => Json(response).into_response(),
        Err(failure) => {
            error!(
                source = %source.id,
                stage = %failure.stage,
                error = %failure.error,
                "Failed to fetch news"
            );
            error_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to fetch news from {}", source.name),
                &failure.error,
            )
        }
    }
}

fn error_reply(status: StatusCode, message: String, error: &NewsError) -> Response {
    let body: ErrorResponse = failure_response(message, error);
    (status, Json(body)).into_response()
}

async fn list_sources(State(state): State<AppState>) -> Json<SourcesResponse> {
    let config = state.config();
    let sources = config
        .sources
        .iter()
        .map(|s| SourceSummary {
            id: s.id.clone(),
            name: s.name.clone(),
            country: s.country.clone(),
            url: s.url.clone(),
            language: s.language.clone(),
            description: s.description.clone(),
            translated: config.translates(s),
        })
        .collect();
    Json(SourcesResponse {
        success: true,
        sources,
    })
}
