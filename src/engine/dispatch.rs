use tracing::{info, warn};

use crate::board::BoardError;
use crate::error::AppError;
use crate::models::driver::DriverId;
use crate::models::event::BoardEvent;
use crate::models::order::{DeliveryOrder, OrderId};
use crate::state::AppState;

const ASSIGN: &str = "assign";
const DELIVER: &str = "deliver";

pub async fn assign_order(
    state: &AppState,
    order_id: OrderId,
    driver_id: DriverId,
) -> Result<DeliveryOrder, AppError> {
    let outcome = {
        let mut board = state.board.write().await;
        let result = board.assign(order_id, driver_id).cloned();
        result.map(|order| {
            let driver_name = board.driver_name(driver_id).to_string();
            (order, driver_name, board.counts())
        })
    };

    let (order, driver_name, counts) = outcome.map_err(|err| rejected(state, ASSIGN, err))?;

    state.metrics.record_transition(ASSIGN, "success");
    state.metrics.record_counts(counts);
    info!(
        order_id = %order.id,
        invoice = %order.invoice,
        driver_id = %driver_id,
        "order assigned"
    );

    state.publish(BoardEvent::OrderAssigned {
        order: order.clone(),
        driver_name: driver_name.clone(),
    });
    state
        .notify(format!("Order {} assigned to {driver_name}.", order.invoice))
        .await;

    Ok(order)
}

pub async fn deliver_order(state: &AppState, order_id: OrderId) -> Result<DeliveryOrder, AppError> {
    let outcome = {
        let mut board = state.board.write().await;
        let result = board.mark_delivered(order_id).cloned();
        result.map(|order| (order, board.counts()))
    };

    let (order, counts) = outcome.map_err(|err| rejected(state, DELIVER, err))?;

    state.metrics.record_transition(DELIVER, "success");
    state.metrics.record_counts(counts);
    info!(
        order_id = %order.id,
        invoice = %order.invoice,
        delivered_at = ?order.delivered_at(),
        "order delivered"
    );

    state.publish(BoardEvent::OrderDelivered {
        order: order.clone(),
    });
    state
        .notify(format!("Order {} marked as delivered.", order.invoice))
        .await;

    Ok(order)
}

fn rejected(state: &AppState, transition: &str, err: BoardError) -> AppError {
    let outcome = match err {
        BoardError::OrderNotFound(_) => "not_found",
        BoardError::InvalidTransition { .. } => "invalid_transition",
        BoardError::UnknownDriver(_) => "unknown_driver",
        _ => "error",
    };
    state.metrics.record_transition(transition, outcome);
    warn!(transition, outcome, error = %err, "transition rejected");

    err.into()
}
