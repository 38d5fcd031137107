use std::num::NonZeroUsize;
use std::time::Duration;

use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use crate::board::OrderBoard;
use crate::engine::ingest::IngestScheduler;
use crate::models::event::BoardEvent;
use crate::notice::{Notice, Notifier};
use crate::observability::metrics::Metrics;
use crate::render::DisplayOptions;

pub const DEFAULT_EVENT_BUFFER_SIZE: NonZeroUsize = match NonZeroUsize::new(1024) {
    Some(size) => size,
    None => unreachable!(),
};

#[derive(Debug, Clone)]
pub struct StateOptions {
    pub event_buffer_size: NonZeroUsize,
    pub ingest_delay: Duration,
    pub ingest_seed: Option<u64>,
    pub notice_ttl: Duration,
    pub display: DisplayOptions,
}

impl Default for StateOptions {
    fn default() -> Self {
        Self {
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
            ingest_delay: Duration::from_millis(1000),
            ingest_seed: None,
            notice_ttl: Duration::from_millis(3000),
            display: DisplayOptions::default(),
        }
    }
}

pub struct AppState {
    pub board: RwLock<OrderBoard>,
    pub ingest: IngestScheduler,
    pub notices: Notifier,
    pub events_tx: broadcast::Sender<BoardEvent>,
    pub metrics: Metrics,
    pub display: DisplayOptions,
}

impl AppState {
    pub fn new(board: OrderBoard, options: StateOptions) -> Self {
        let (events_tx, _unused_rx) = broadcast::channel(options.event_buffer_size.get());
        let metrics = Metrics::new();
        metrics.record_counts(board.counts());

        Self {
            board: RwLock::new(board),
            ingest: IngestScheduler::new(options.ingest_delay, options.ingest_seed),
            notices: Notifier::new(options.notice_ttl),
            events_tx,
            metrics,
            display: options.display,
        }
    }

    /// Fans an event out to websocket subscribers. Having none is fine.
    pub fn publish(&self, event: BoardEvent) {
        if self.events_tx.send(event).is_err() {
            debug!("no event subscribers");
        }
    }

    pub async fn notify(&self, message: impl Into<String>) -> Notice {
        let notice = self.notices.post(message).await;
        self.publish(BoardEvent::Notice {
            notice: notice.clone(),
        });
        notice
    }
}
