use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry,
    TextEncoder,
};

use crate::board::StatusCounts;
use crate::models::order::OrderStatus;

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub transitions_total: IntCounterVec,
    pub board_orders: IntGaugeVec,
    pub ingest_latency_seconds: Histogram,
    pub ingest_in_flight: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let transitions_total = IntCounterVec::new(
            Opts::new("transitions_total", "Order transitions by kind and outcome"),
            &["transition", "outcome"],
        )
        .expect("valid transitions_total metric");

        let board_orders = IntGaugeVec::new(
            Opts::new("board_orders", "Orders currently on the board by status"),
            &["status"],
        )
        .expect("valid board_orders metric");

        let ingest_latency_seconds = Histogram::with_opts(HistogramOpts::new(
            "ingest_latency_seconds",
            "Time from scheduling a fetch to the order landing on the board",
        ))
        .expect("valid ingest_latency_seconds metric");

        let ingest_in_flight = IntGauge::new("ingest_in_flight", "1 while a fetch is pending")
            .expect("valid ingest_in_flight metric");

        registry
            .register(Box::new(transitions_total.clone()))
            .expect("register transitions_total");
        registry
            .register(Box::new(board_orders.clone()))
            .expect("register board_orders");
        registry
            .register(Box::new(ingest_latency_seconds.clone()))
            .expect("register ingest_latency_seconds");
        registry
            .register(Box::new(ingest_in_flight.clone()))
            .expect("register ingest_in_flight");

        Self {
            registry,
            transitions_total,
            board_orders,
            ingest_latency_seconds,
            ingest_in_flight,
        }
    }

    pub fn record_counts(&self, counts: StatusCounts) {
        for status in OrderStatus::ALL {
            let count = i64::try_from(counts.get(status)).unwrap_or(i64::MAX);
            self.board_orders
                .with_label_values(&[status.as_str()])
                .set(count);
        }
    }

    pub fn record_transition(&self, transition: &str, outcome: &str) {
        self.transitions_total
            .with_label_values(&[transition, outcome])
            .inc();
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
