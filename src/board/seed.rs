use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::board::{BoardError, OrderBoard};
use crate::models::driver::{Driver, DriverId};
use crate::models::order::{DeliveryOrder, Invoice, OrderDraft, OrderId, Progress};

pub fn roster() -> Vec<Driver> {
    vec![
        Driver::new(1, "Alice", "D1", "123-456-7890"),
        Driver::new(2, "Bob", "D2", "987-654-3210"),
        Driver::new(3, "Charlie", "D3", "555-123-4567"),
    ]
}

/// Board preloaded with one order in every state. INV004 counts as delivered
/// two hours before `now`.
pub fn demo_board(now: DateTime<Utc>) -> Result<OrderBoard, BoardError> {
    let orders = vec![
        seed_order(
            101,
            1,
            draft("Shop A", "North", 15000, 4, &["WH1"], true),
            Progress::Assigned {
                driver_id: DriverId(1),
            },
        ),
        seed_order(
            102,
            2,
            draft("Shop B", "South", 7550, 2, &["WH3", "WH5"], true),
            Progress::Unassigned,
        ),
        seed_order(
            103,
            3,
            draft("Shop C", "East", 20000, 5, &["WH2"], false),
            Progress::Assigned {
                driver_id: DriverId(2),
            },
        ),
        seed_order(
            104,
            4,
            draft("Shop D", "West", 30000, 1, &["WH4"], false),
            Progress::Delivered {
                driver_id: DriverId(1),
                delivered_at: now - Duration::hours(2),
            },
        ),
        seed_order(
            105,
            5,
            draft("Shop E", "Central", 18000, 3, &["WH1", "WH3"], false),
            Progress::Unassigned,
        ),
    ];

    OrderBoard::from_parts(roster(), orders)
}

fn draft(
    garage: &str,
    area: &str,
    total_cents: i64,
    items: u32,
    warehouses: &[&str],
    urgent: bool,
) -> OrderDraft {
    OrderDraft {
        garage: garage.to_string(),
        area: area.to_string(),
        total: Decimal::new(total_cents, 2),
        items,
        warehouses: warehouses.iter().map(|w| w.to_string()).collect(),
        urgent,
    }
}

fn seed_order(id: u64, invoice_seq: u32, draft: OrderDraft, progress: Progress) -> DeliveryOrder {
    DeliveryOrder {
        id: OrderId(id),
        invoice: Invoice::from_sequence(invoice_seq),
        garage: draft.garage,
        area: draft.area,
        total: draft.total,
        items: draft.items,
        warehouses: draft.warehouses,
        urgent: draft.urgent,
        progress,
    }
}
