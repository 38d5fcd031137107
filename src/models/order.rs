use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::driver::DriverId;

const INVOICE_PREFIX: &str = "INV";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-readable order reference of the form `INV###`.
///
/// The sequence is zero-padded to three digits. Views compare invoices
/// lexically, so past `INV999` the padding no longer preserves numeric order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Invoice(String);

impl Invoice {
    pub fn from_sequence(sequence: u32) -> Self {
        Self(format!("{INVOICE_PREFIX}{sequence:03}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric part of the invoice, if it follows the `INV###` shape.
    pub fn sequence(&self) -> Option<u32> {
        self.0.strip_prefix(INVOICE_PREFIX)?.parse().ok()
    }
}

impl fmt::Display for Invoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Unassigned,
    Assigned,
    Delivered,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 3] = [
        OrderStatus::Unassigned,
        OrderStatus::Assigned,
        OrderStatus::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Unassigned => "Unassigned",
            OrderStatus::Assigned => "Assigned",
            OrderStatus::Delivered => "Delivered",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an order is in its lifecycle, together with the data each stage
/// requires. A driver exists exactly when the order left `Unassigned`, and a
/// delivery time exactly when it reached `Delivered`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum Progress {
    Unassigned,
    Assigned {
        driver_id: DriverId,
    },
    Delivered {
        driver_id: DriverId,
        delivered_at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryOrder {
    pub id: OrderId,
    pub invoice: Invoice,
    pub garage: String,
    pub area: String,
    pub total: Decimal,
    pub items: u32,
    pub warehouses: Vec<String>,
    pub urgent: bool,
    #[serde(flatten)]
    pub progress: Progress,
}

impl DeliveryOrder {
    pub fn status(&self) -> OrderStatus {
        match self.progress {
            Progress::Unassigned => OrderStatus::Unassigned,
            Progress::Assigned { .. } => OrderStatus::Assigned,
            Progress::Delivered { .. } => OrderStatus::Delivered,
        }
    }

    pub fn driver_id(&self) -> Option<DriverId> {
        match self.progress {
            Progress::Unassigned => None,
            Progress::Assigned { driver_id } | Progress::Delivered { driver_id, .. } => {
                Some(driver_id)
            }
        }
    }

    pub fn delivered_at(&self) -> Option<DateTime<Utc>> {
        match self.progress {
            Progress::Delivered { delivered_at, .. } => Some(delivered_at),
            _ => None,
        }
    }
}

/// Descriptive fields of an order before the board gives it an id and invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub garage: String,
    pub area: String,
    pub total: Decimal,
    pub items: u32,
    pub warehouses: Vec<String>,
    pub urgent: bool,
}
