use lazy_static::lazy_static;
use prometheus::{register_counter_vec, register_histogram, CounterVec, Histogram};

lazy_static! {
    // ── Upstream ────────────────────────────────────────────────────────────
    pub static ref UPSTREAM_FETCHES_COUNTER: CounterVec = register_counter_vec!(
        "feed_upstream_fetches_total",
        "Requests to the ERP announcements endpoint by outcome",
        &["outcome"]
    ).unwrap();

    pub static ref UPSTREAM_FETCH_SECONDS: Histogram = register_histogram!(
        "feed_upstream_fetch_seconds",
        "Latency of requests to the ERP announcements endpoint"
    ).unwrap();

    // ── Feed ────────────────────────────────────────────────────────────────
    pub static ref ANNOUNCEMENTS_SERVED_COUNTER: CounterVec = register_counter_vec!(
        "feed_announcements_served_total",
        "Announcements returned to viewers by role",
        &["role"]
    ).unwrap();
}

pub fn record_fetch(outcome: &str, seconds: f64) {
    UPSTREAM_FETCHES_COUNTER.with_label_values(&[outcome]).inc();
    UPSTREAM_FETCH_SECONDS.observe(seconds);
}

pub fn record_served(role: &str, count: usize) {
    ANNOUNCEMENTS_SERVED_COUNTER
        .with_label_values(&[role])
        .inc_by(count as f64);
}
