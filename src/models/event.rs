use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::order::DeliveryOrder;
use crate::notice::Notice;

/// Handle for a scheduled synthetic fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestTicket {
    pub id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub ready_at: DateTime<Utc>,
}

/// Change notifications published to websocket subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BoardEvent {
    OrderIngested {
        order: DeliveryOrder,
    },
    OrderAssigned {
        order: DeliveryOrder,
        driver_name: String,
    },
    OrderDelivered {
        order: DeliveryOrder,
    },
    IngestScheduled {
        ticket: IngestTicket,
    },
    IngestCancelled {
        ticket_id: Uuid,
    },
    Notice {
        notice: Notice,
    },
}
