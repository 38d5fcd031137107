use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use prometheus::IntGauge;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::engine::generator::random_draft;
use crate::error::AppError;
use crate::models::event::{BoardEvent, IngestTicket};
use crate::models::order::DeliveryOrder;
use crate::state::AppState;

struct PendingIngest {
    ticket: IngestTicket,
    handle: JoinHandle<()>,
}

/// Runs the simulated "fetch new orders" call: one order after a fixed
/// delay, never more than one at a time.
pub struct IngestScheduler {
    delay: Duration,
    busy: Arc<AtomicBool>,
    pending: Mutex<Option<PendingIngest>>,
    rng: Mutex<ChaCha8Rng>,
}

/// Holds the in-flight slot. Dropping it, including when the task owning it
/// is aborted, frees the slot.
pub struct IngestGuard {
    busy: Arc<AtomicBool>,
    gauge: IntGauge,
}

impl Drop for IngestGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
        self.gauge.set(0);
    }
}

impl IngestScheduler {
    pub fn new(delay: Duration, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        info!(seed, delay_ms = delay.as_millis() as u64, "ingest generator seeded");

        Self {
            delay,
            busy: Arc::new(AtomicBool::new(false)),
            pending: Mutex::new(None),
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub async fn pending_ticket(&self) -> Option<IngestTicket> {
        self.pending.lock().await.as_ref().map(|p| p.ticket.clone())
    }

    fn try_begin(&self, gauge: &IntGauge) -> Option<IngestGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        gauge.set(1);

        Some(IngestGuard {
            busy: Arc::clone(&self.busy),
            gauge: gauge.clone(),
        })
    }
}

/// Schedules one synthetic fetch. The order lands on the board once the
/// configured delay has passed, unless the fetch is cancelled first.
pub async fn schedule_ingest(state: &Arc<AppState>) -> Result<IngestTicket, AppError> {
    let guard = state
        .ingest
        .try_begin(&state.metrics.ingest_in_flight)
        .ok_or_else(|| {
            warn!("fetch requested while another is in flight");
            AppError::IngestInFlight
        })?;

    let delay = state.ingest.delay();
    let now = Utc::now();
    let ticket = IngestTicket {
        id: Uuid::new_v4(),
        scheduled_at: now,
        ready_at: now + TimeDelta::from_std(delay).unwrap_or(TimeDelta::zero()),
    };

    // Held across the spawn so the task cannot observe an empty slot.
    let mut pending = state.ingest.pending.lock().await;

    let task_state = Arc::clone(state);
    let task_ticket = ticket.clone();
    let handle = tokio::spawn(async move {
        let _guard = guard;
        sleep(delay).await;

        {
            let mut pending = task_state.ingest.pending.lock().await;
            let still_pending = pending
                .as_ref()
                .is_some_and(|p| p.ticket.id == task_ticket.id);
            if !still_pending {
                return;
            }
            *pending = None;
        }

        if let Err(err) = complete_ingest(&task_state, Some(&task_ticket)).await {
            error!(ticket_id = %task_ticket.id, error = %err, "scheduled fetch failed");
        }
    });

    *pending = Some(PendingIngest {
        ticket: ticket.clone(),
        handle,
    });
    drop(pending);

    info!(ticket_id = %ticket.id, ready_at = %ticket.ready_at, "fetch scheduled");
    state.publish(BoardEvent::IngestScheduled {
        ticket: ticket.clone(),
    });

    Ok(ticket)
}

/// Cancels the pending fetch, if any. Returns the cancelled ticket; once this
/// returns the in-flight slot is free again.
pub async fn cancel_ingest(state: &AppState) -> Option<IngestTicket> {
    let pending = state.ingest.pending.lock().await.take()?;

    pending.handle.abort();
    match pending.handle.await {
        Ok(()) => {}
        Err(err) if err.is_cancelled() => {}
        Err(err) => error!(error = %err, "fetch task failed while cancelling"),
    }

    info!(ticket_id = %pending.ticket.id, "fetch cancelled");
    state.publish(BoardEvent::IngestCancelled {
        ticket_id: pending.ticket.id,
    });

    Some(pending.ticket)
}

/// Runs a fetch immediately, skipping the delay. Still refuses to overlap
/// with a scheduled one.
pub async fn ingest_now(state: &AppState) -> Result<DeliveryOrder, AppError> {
    let _guard = state
        .ingest
        .try_begin(&state.metrics.ingest_in_flight)
        .ok_or(AppError::IngestInFlight)?;

    complete_ingest(state, None).await
}

async fn complete_ingest(
    state: &AppState,
    ticket: Option<&IngestTicket>,
) -> Result<DeliveryOrder, AppError> {
    let draft = {
        let mut rng = state.ingest.rng.lock().await;
        random_draft(&mut *rng)
    };

    let (order, counts) = {
        let mut board = state.board.write().await;
        let order = board.ingest(draft)?.clone();
        (order, board.counts())
    };

    state.metrics.record_counts(counts);
    if let Some(ticket) = ticket {
        let elapsed = (Utc::now() - ticket.scheduled_at)
            .to_std()
            .unwrap_or(Duration::ZERO);
        state
            .metrics
            .ingest_latency_seconds
            .observe(elapsed.as_secs_f64());
    }

    info!(
        order_id = %order.id,
        invoice = %order.invoice,
        urgent = order.urgent,
        "order ingested"
    );

    state.publish(BoardEvent::OrderIngested {
        order: order.clone(),
    });
    state
        .notify(format!("Fetched 1 new order (Invoice {}).", order.invoice))
        .await;

    Ok(order)
}
