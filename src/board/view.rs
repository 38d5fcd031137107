use std::cmp::{Ordering, Reverse};

use serde::Serialize;

use crate::board::OrderBoard;
use crate::models::order::{DeliveryOrder, OrderStatus};

/// Orders in one status, in display order. Views are rebuilt from the board
/// on every call; nothing is cached between mutations.
#[derive(Debug, Clone)]
pub struct BoardView<'a> {
    pub status: OrderStatus,
    pub orders: Vec<&'a DeliveryOrder>,
}

impl BoardView<'_> {
    pub fn count(&self) -> usize {
        self.orders.len()
    }

    pub fn invoices(&self) -> Vec<&str> {
        self.orders.iter().map(|o| o.invoice.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub unassigned: usize,
    pub assigned: usize,
    pub delivered: usize,
}

impl StatusCounts {
    pub fn get(&self, status: OrderStatus) -> usize {
        match status {
            OrderStatus::Unassigned => self.unassigned,
            OrderStatus::Assigned => self.assigned,
            OrderStatus::Delivered => self.delivered,
        }
    }
}

/// Urgent orders first, then ascending invoice.
pub fn by_priority(a: &DeliveryOrder, b: &DeliveryOrder) -> Ordering {
    b.urgent
        .cmp(&a.urgent)
        .then_with(|| a.invoice.as_str().cmp(b.invoice.as_str()))
}

impl OrderBoard {
    pub fn view(&self, status: OrderStatus) -> BoardView<'_> {
        let mut orders: Vec<&DeliveryOrder> = self
            .orders()
            .iter()
            .filter(|o| o.status() == status)
            .collect();

        match status {
            OrderStatus::Unassigned | OrderStatus::Assigned => {
                orders.sort_by(|a, b| by_priority(a, b));
            }
            // Stable sort: equal timestamps keep arrival order.
            OrderStatus::Delivered => orders.sort_by_key(|o| Reverse(o.delivered_at())),
        }

        BoardView { status, orders }
    }

    pub fn unassigned(&self) -> BoardView<'_> {
        self.view(OrderStatus::Unassigned)
    }

    pub fn assigned(&self) -> BoardView<'_> {
        self.view(OrderStatus::Assigned)
    }

    pub fn delivered(&self) -> BoardView<'_> {
        self.view(OrderStatus::Delivered)
    }

    pub fn counts(&self) -> StatusCounts {
        self.orders()
            .iter()
            .fold(StatusCounts::default(), |mut counts, order| {
                match order.status() {
                    OrderStatus::Unassigned => counts.unassigned += 1,
                    OrderStatus::Assigned => counts.assigned += 1,
                    OrderStatus::Delivered => counts.delivered += 1,
                }
                counts
            })
    }
}
