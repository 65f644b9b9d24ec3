//! Prometheus metrics for emojiart-server.
//!
//! Provides metrics collection and a Prometheus-compatible `/metrics` endpoint.

use metrics::{counter, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

const GENERATIONS_TOTAL: &str = "emojiart_generations_total";
const SHARE_WARMS_TOTAL: &str = "emojiart_share_warms_total";
const SHARE_LOOKUPS_TOTAL: &str = "emojiart_share_lookups_total";
const SHARE_CACHE_ENTRIES: &str = "emojiart_share_cache_entries";
const PAGE_VIEWS_TOTAL: &str = "emojiart_page_views_total";
const VALIDATION_FAILURES_TOTAL: &str = "emojiart_validation_failures_total";

/// Initialize metrics and return the Prometheus handle.
///
/// # Errors
///
/// Returns an error if the Prometheus recorder cannot be installed
/// (e.g., if another recorder is already installed).
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Record how a generation request ended.
///
/// # Arguments
///
/// * `outcome` - "cached", "generated", "failed" or "unavailable"
pub fn record_generation(outcome: &str) {
    counter!(GENERATIONS_TOTAL, "outcome" => outcome.to_string()).increment(1);
}

/// Record a share warm call and the resulting cache size.
pub fn record_share_warm(entries: usize) {
    counter!(SHARE_WARMS_TOTAL).increment(1);
    #[allow(clippy::cast_precision_loss)]
    gauge!(SHARE_CACHE_ENTRIES).set(entries as f64);
}

/// Record a share cache lookup.
pub fn record_share_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!(SHARE_LOOKUPS_TOTAL, "result" => result).increment(1);
}

/// Record a page render.
///
/// # Arguments
///
/// * `shared` - whether the page carried a valid share key
pub fn record_page_view(shared: bool) {
    counter!(PAGE_VIEWS_TOTAL, "shared" => shared.to_string()).increment(1);
}

/// Record an input validation failure.
///
/// # Arguments
///
/// * `field` - Which input failed ("share_key", "image")
pub fn record_validation_failure(field: &str) {
    counter!(VALIDATION_FAILURES_TOTAL, "field" => field.to_string()).increment(1);
}
