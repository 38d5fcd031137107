use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::Serialize;

use crate::engine::ingest::{cancel_ingest, schedule_ingest};
use crate::error::AppError;
use crate::models::event::IngestTicket;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/ingest",
        get(ingest_status).post(start_ingest).delete(stop_ingest),
    )
}

#[derive(Serialize)]
pub struct IngestStatus {
    pub busy: bool,
    pub pending: Option<IngestTicket>,
}

#[derive(Serialize)]
pub struct CancelResponse {
    pub cancelled: Option<IngestTicket>,
}

async fn ingest_status(State(state): State<Arc<AppState>>) -> Json<IngestStatus> {
    Json(IngestStatus {
        busy: state.ingest.is_busy(),
        pending: state.ingest.pending_ticket().await,
    })
}

async fn start_ingest(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<IngestTicket>), AppError> {
    let ticket = schedule_ingest(&state).await?;
    Ok((StatusCode::ACCEPTED, Json(ticket)))
}

async fn stop_ingest(State(state): State<Arc<AppState>>) -> Json<CancelResponse> {
    Json(CancelResponse {
        cancelled: cancel_ingest(&state).await,
    })
}
