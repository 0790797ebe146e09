//! Prometheus metrics

use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};
use std::sync::LazyLock;

pub static GENERATION_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    register_counter_vec!(
        "dazzign_generation_total",
        "Image generation requests by provider and outcome",
        &["provider", "outcome"]
    )
    .unwrap()
});

pub static GENERATION_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    register_histogram_vec!(
        "dazzign_generation_duration_seconds",
        "Image generation latency by provider",
        &["provider"],
        vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]
    )
    .unwrap()
});

pub static SPEC_EXTRACTIONS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    register_counter_vec!(
        "dazzign_spec_extractions_total",
        "Spec extraction requests by provider and outcome",
        &["provider", "outcome"]
    )
    .unwrap()
});

pub static SAMPLE_FALLBACKS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    register_counter_vec!(
        "dazzign_sample_fallbacks_total",
        "Responses served from bundled samples after a storage failure",
        &["endpoint"]
    )
    .unwrap()
});

/// Render all registered metrics in the Prometheus text format
pub fn gather() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
