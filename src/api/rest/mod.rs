pub mod drivers;
pub mod ingest;
pub mod orders;
pub mod page;
pub mod ws;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::Serialize;
use tower_http::services::ServeDir;

use crate::render::{snapshot, BoardSnapshot};
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    router_with_static(state, "static")
}

pub fn router_with_static(state: Arc<AppState>, static_dir: &str) -> Router {
    Router::new()
        .merge(drivers::router())
        .merge(orders::router())
        .merge(ingest::router())
        .merge(page::router())
        .route("/board", get(board))
        .route("/notification", get(notification))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/ws", get(ws::ws_handler))
        .with_state(state)
        .fallback_service(ServeDir::new(static_dir))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    drivers: usize,
    orders: usize,
    ingest_in_flight: bool,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let board = state.board.read().await;
    Json(HealthResponse {
        status: "ok",
        drivers: board.drivers().len(),
        orders: board.len(),
        ingest_in_flight: state.ingest.is_busy(),
    })
}

async fn board(State(state): State<Arc<AppState>>) -> Json<BoardSnapshot> {
    let board = state.board.read().await;
    Json(snapshot(&board, &state.display))
}

async fn notification(State(state): State<Arc<AppState>>) -> Response {
    match state.notices.current().await {
        Some(notice) => Json(notice).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err).into_response(),
    }
}
