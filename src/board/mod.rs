pub mod seed;
pub mod view;

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::driver::{Driver, DriverId};
use crate::models::order::{DeliveryOrder, Invoice, OrderDraft, OrderId, OrderStatus, Progress};

pub use view::{BoardView, StatusCounts};

const UNKNOWN_DRIVER_NAME: &str = "Unknown";
const ORDER_IDS: &str = "order ids";
const INVOICE_NUMBERS: &str = "invoice numbers";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    #[error("driver {0} is not on the roster")]
    UnknownDriver(DriverId),

    #[error("order {order_id} cannot move from {from} to {to}")]
    InvalidTransition {
        order_id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("invalid order: {0}")]
    InvalidDraft(String),

    #[error("duplicate order id {0}")]
    DuplicateOrder(OrderId),

    #[error("duplicate invoice {0}")]
    DuplicateInvoice(Invoice),

    #[error("duplicate driver id {0}")]
    DuplicateDriver(DriverId),

    #[error("no {0} left to hand out")]
    CounterExhausted(&'static str),
}

/// Owned state of the dispatch board: the driver roster and every order
/// ever seen, in arrival order.
#[derive(Debug, Clone)]
pub struct OrderBoard {
    drivers: Vec<Driver>,
    orders: Vec<DeliveryOrder>,
    next_order_id: u64,
    next_invoice_seq: u32,
}

impl OrderBoard {
    pub fn new(drivers: Vec<Driver>) -> Result<Self, BoardError> {
        Self::from_parts(drivers, Vec::new())
    }

    /// Builds a board around pre-existing orders. Id and invoice counters
    /// continue after the highest values found.
    pub fn from_parts(
        drivers: Vec<Driver>,
        orders: Vec<DeliveryOrder>,
    ) -> Result<Self, BoardError> {
        let mut driver_ids = HashSet::new();
        for driver in &drivers {
            if !driver_ids.insert(driver.id) {
                return Err(BoardError::DuplicateDriver(driver.id));
            }
        }

        let mut order_ids = HashSet::new();
        let mut invoices = HashSet::new();
        for order in &orders {
            if !order_ids.insert(order.id) {
                return Err(BoardError::DuplicateOrder(order.id));
            }
            if !invoices.insert(order.invoice.clone()) {
                return Err(BoardError::DuplicateInvoice(order.invoice.clone()));
            }
            validate_fields(order.total, order.items, &order.warehouses)?;
        }

        let next_order_id = orders
            .iter()
            .map(|o| o.id.0)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or(BoardError::CounterExhausted(ORDER_IDS))?;
        let next_invoice_seq = orders
            .iter()
            .filter_map(|o| o.invoice.sequence())
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or(BoardError::CounterExhausted(INVOICE_NUMBERS))?;

        Ok(Self {
            drivers,
            orders,
            next_order_id,
            next_invoice_seq,
        })
    }

    pub fn drivers(&self) -> &[Driver] {
        &self.drivers
    }

    pub fn driver(&self, id: DriverId) -> Option<&Driver> {
        self.drivers.iter().find(|d| d.id == id)
    }

    pub fn driver_name(&self, id: DriverId) -> &str {
        self.driver(id)
            .map(|d| d.name.as_str())
            .unwrap_or(UNKNOWN_DRIVER_NAME)
    }

    pub fn orders(&self) -> &[DeliveryOrder] {
        &self.orders
    }

    pub fn order(&self, id: OrderId) -> Option<&DeliveryOrder> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Appends a new `Unassigned` order built from `draft`, giving it the next
    /// id and invoice.
    pub fn ingest(&mut self, draft: OrderDraft) -> Result<&DeliveryOrder, BoardError> {
        validate_fields(draft.total, draft.items, &draft.warehouses)?;
        let following_id = self
            .next_order_id
            .checked_add(1)
            .ok_or(BoardError::CounterExhausted(ORDER_IDS))?;
        let following_seq = self
            .next_invoice_seq
            .checked_add(1)
            .ok_or(BoardError::CounterExhausted(INVOICE_NUMBERS))?;

        let order = DeliveryOrder {
            id: OrderId(self.next_order_id),
            invoice: Invoice::from_sequence(self.next_invoice_seq),
            garage: draft.garage,
            area: draft.area,
            total: draft.total.round_dp(2),
            items: draft.items,
            warehouses: draft.warehouses,
            urgent: draft.urgent,
            progress: Progress::Unassigned,
        };

        self.next_order_id = following_id;
        self.next_invoice_seq = following_seq;
        self.orders.push(order);

        self.orders
            .last()
            .ok_or_else(|| BoardError::InvalidDraft("order was not appended".to_string()))
    }

    pub fn assign(
        &mut self,
        order_id: OrderId,
        driver_id: DriverId,
    ) -> Result<&DeliveryOrder, BoardError> {
        let driver_known = self.driver(driver_id).is_some();
        let order = self.order_mut(order_id)?;

        if order.progress != Progress::Unassigned {
            return Err(BoardError::InvalidTransition {
                order_id,
                from: order.status(),
                to: OrderStatus::Assigned,
            });
        }
        if !driver_known {
            return Err(BoardError::UnknownDriver(driver_id));
        }

        order.progress = Progress::Assigned { driver_id };
        Ok(&*order)
    }

    pub fn mark_delivered(&mut self, order_id: OrderId) -> Result<&DeliveryOrder, BoardError> {
        self.mark_delivered_at(order_id, Utc::now())
    }

    pub fn mark_delivered_at(
        &mut self,
        order_id: OrderId,
        delivered_at: DateTime<Utc>,
    ) -> Result<&DeliveryOrder, BoardError> {
        let order = self.order_mut(order_id)?;

        let Progress::Assigned { driver_id } = order.progress else {
            return Err(BoardError::InvalidTransition {
                order_id,
                from: order.status(),
                to: OrderStatus::Delivered,
            });
        };

        order.progress = Progress::Delivered {
            driver_id,
            delivered_at,
        };
        Ok(&*order)
    }

    fn order_mut(&mut self, id: OrderId) -> Result<&mut DeliveryOrder, BoardError> {
        self.orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(BoardError::OrderNotFound(id))
    }
}

fn validate_fields(total: Decimal, items: u32, warehouses: &[String]) -> Result<(), BoardError> {
    if total.is_sign_negative() {
        return Err(BoardError::InvalidDraft(format!(
            "total must not be negative, got {total}"
        )));
    }
    if items == 0 {
        return Err(BoardError::InvalidDraft("items must be > 0".to_string()));
    }
    if warehouses.is_empty() {
        return Err(BoardError::InvalidDraft(
            "at least one warehouse is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for code in warehouses {
        if !seen.insert(code.as_str()) {
            return Err(BoardError::InvalidDraft(format!(
                "warehouse {code} listed twice"
            )));
        }
    }

    Ok(())
}
