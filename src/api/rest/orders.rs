use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;

use crate::engine::dispatch::{assign_order, deliver_order};
use crate::error::AppError;
use crate::models::driver::DriverId;
use crate::models::order::{DeliveryOrder, OrderId};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", get(list_orders))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/assign", post(assign))
        .route("/orders/:id/deliver", post(deliver))
}

#[derive(Deserialize)]
pub struct AssignRequest {
    pub driver_id: DriverId,
}

async fn list_orders(State(state): State<Arc<AppState>>) -> Json<Vec<DeliveryOrder>> {
    let board = state.board.read().await;
    Json(board.orders().to_vec())
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<DeliveryOrder>, AppError> {
    let board = state.board.read().await;
    let order = board
        .order(OrderId(id))
        .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

    Ok(Json(order.clone()))
}

async fn assign(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(payload): Json<AssignRequest>,
) -> Result<Json<DeliveryOrder>, AppError> {
    let order = assign_order(&state, OrderId(id), payload.driver_id).await?;
    Ok(Json(order))
}

async fn deliver(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<DeliveryOrder>, AppError> {
    let order = deliver_order(&state, OrderId(id)).await?;
    Ok(Json(order))
}
