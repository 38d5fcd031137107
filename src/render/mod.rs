pub mod html;

use chrono::{DateTime, Local, Locale, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::board::{BoardView, OrderBoard};
use crate::models::driver::DriverId;
use crate::models::order::{DeliveryOrder, OrderId, OrderStatus, Progress};

const CURRENCY_SYMBOL: &str = "$";

#[derive(Debug, Clone, Copy)]
pub struct DisplayOptions {
    pub locale: Locale,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            locale: Locale::en_US,
        }
    }
}

/// `$` followed by the amount at two decimal places.
pub fn format_money(amount: Decimal) -> String {
    format!("{CURRENCY_SYMBOL}{:.2}", amount.round_dp(2))
}

/// Local date and time in the locale's own representation.
pub fn format_timestamp(at: DateTime<Utc>, options: &DisplayOptions) -> String {
    at.with_timezone(&Local)
        .format_localized("%x %X", options.locale)
        .to_string()
}

pub fn priority_label(urgent: bool) -> &'static str {
    if urgent { "Urgent" } else { "Normal" }
}

pub fn table_title(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Unassigned => "Unassigned Orders",
        OrderStatus::Assigned => "Assigned Orders",
        OrderStatus::Delivered => "Delivered Orders",
    }
}

pub fn empty_message(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Unassigned => "No unassigned orders.",
        OrderStatus::Assigned => "No orders in progress.",
        OrderStatus::Delivered => "No delivered orders yet.",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverChoice {
    pub id: DriverId,
    pub name: String,
}

/// Status-dependent trailing columns of a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum RowAction {
    Assign {
        drivers: Vec<DriverChoice>,
    },
    Deliver {
        driver: String,
    },
    Delivered {
        driver: String,
        delivered_at: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub order_id: OrderId,
    pub urgent: bool,
    pub priority: &'static str,
    pub invoice: String,
    pub garage: String,
    pub area: String,
    pub total: String,
    pub items: u32,
    pub warehouses: String,
    pub action: RowAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub status: OrderStatus,
    pub title: &'static str,
    pub count: usize,
    pub empty_message: &'static str,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    pub unassigned: Table,
    pub assigned: Table,
    pub delivered: Table,
}

impl BoardSnapshot {
    pub fn tables(&self) -> [&Table; 3] {
        [&self.unassigned, &self.assigned, &self.delivered]
    }
}

/// Derives all three tables from the current board.
pub fn snapshot(board: &OrderBoard, options: &DisplayOptions) -> BoardSnapshot {
    BoardSnapshot {
        unassigned: table(board, board.unassigned(), options),
        assigned: table(board, board.assigned(), options),
        delivered: table(board, board.delivered(), options),
    }
}

fn table(board: &OrderBoard, view: BoardView<'_>, options: &DisplayOptions) -> Table {
    Table {
        status: view.status,
        title: table_title(view.status),
        count: view.count(),
        empty_message: empty_message(view.status),
        rows: view
            .orders
            .iter()
            .map(|order| row(board, order, options))
            .collect(),
    }
}

fn row(board: &OrderBoard, order: &DeliveryOrder, options: &DisplayOptions) -> Row {
    let action = match &order.progress {
        Progress::Unassigned => RowAction::Assign {
            drivers: board
                .drivers()
                .iter()
                .map(|d| DriverChoice {
                    id: d.id,
                    name: d.name.clone(),
                })
                .collect(),
        },
        Progress::Assigned { driver_id } => RowAction::Deliver {
            driver: board.driver_name(*driver_id).to_string(),
        },
        Progress::Delivered {
            driver_id,
            delivered_at,
        } => RowAction::Delivered {
            driver: board.driver_name(*driver_id).to_string(),
            delivered_at: format_timestamp(*delivered_at, options),
        },
    };

    Row {
        order_id: order.id,
        urgent: order.urgent,
        priority: priority_label(order.urgent),
        invoice: order.invoice.to_string(),
        garage: order.garage.clone(),
        area: order.area.clone(),
        total: format_money(order.total),
        items: order.items,
        warehouses: order.warehouses.join(", "),
        action,
    }
}
