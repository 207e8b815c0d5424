use std::net::SocketAddr;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: availability queries served.
pub const AVAILABILITY_QUERIES_TOTAL: &str = "roomd_availability_queries_total";

/// Counter: bookings accepted.
pub const BOOKINGS_TOTAL: &str = "roomd_bookings_total";

/// Counter: booking attempts rejected. Labels: reason.
pub const BOOKINGS_REJECTED_TOTAL: &str = "roomd_bookings_rejected_total";

// ── USE metrics (resource utilization) ──────────────────────────

/// Histogram: WAL group-commit flush duration in seconds.
pub const WAL_FLUSH_DURATION_SECONDS: &str = "roomd_wal_flush_duration_seconds";

/// Histogram: WAL group-commit batch size (events per flush).
pub const WAL_FLUSH_BATCH_SIZE: &str = "roomd_wal_flush_batch_size";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}
