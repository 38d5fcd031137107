use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;

use crate::engine::dispatch::{assign_order, deliver_order};
use crate::engine::ingest::schedule_ingest;
use crate::error::AppError;
use crate::models::driver::DriverId;
use crate::models::order::OrderId;
use crate::render::html::{render_page, PageChrome};
use crate::render::snapshot;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(page))
        .route("/board/orders/:id/assign", post(assign))
        .route("/board/orders/:id/deliver", post(deliver))
        .route("/board/fetch", post(fetch))
}

#[derive(Deserialize)]
pub struct AssignForm {
    pub driver_id: DriverId,
}

async fn page(State(state): State<Arc<AppState>>) -> Html<String> {
    let notice = state.notices.current().await;
    let board = state.board.read().await;
    let snap = snapshot(&board, &state.display);
    drop(board);

    Html(render_page(
        &snap,
        &PageChrome {
            notice: notice.as_ref(),
            ingest_busy: state.ingest.is_busy(),
        },
    ))
}

async fn assign(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Form(form): Form<AssignForm>,
) -> Result<Redirect, AppError> {
    assign_order(&state, OrderId(id), form.driver_id).await?;
    Ok(Redirect::to("/"))
}

async fn deliver(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Redirect, AppError> {
    deliver_order(&state, OrderId(id)).await?;
    Ok(Redirect::to("/"))
}

/// A fetch already in flight is not an error here; the page already shows it.
async fn fetch(State(state): State<Arc<AppState>>) -> Result<Redirect, AppError> {
    match schedule_ingest(&state).await {
        Ok(_) | Err(AppError::IngestInFlight) => Ok(Redirect::to("/")),
        Err(err) => Err(err),
    }
}
