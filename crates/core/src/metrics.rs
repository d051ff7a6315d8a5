//! Prometheus metrics for the asset pipeline.
//!
//! This module provides metrics for:
//! - Disk cache lookups (hit/miss per namespace)
//! - Remote fetches (outcome and duration per asset kind)
//! - Decode failures
//! - Dataset loads

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Registry holding every metric defined here.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// Cache
// =============================================================================

/// Cache lookups by namespace and result.
pub static CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pokedex_cache_lookups_total", "Total asset cache lookups"),
        &["namespace", "result"], // "hit", "miss"
    )
    .unwrap()
});

// =============================================================================
// Fetches
// =============================================================================

/// Remote fetches by asset kind and outcome.
pub static ASSET_FETCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pokedex_asset_fetches_total", "Total remote asset fetches"),
        &["kind", "outcome"], // "payload", "absent", "error"
    )
    .unwrap()
});

/// Remote fetch duration in seconds.
pub static ASSET_FETCH_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "pokedex_asset_fetch_duration_seconds",
            "Duration of remote asset fetches",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["kind"],
    )
    .unwrap()
});

/// Payloads that could not be decoded.
pub static DECODE_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "pokedex_asset_decode_failures_total",
            "Asset payloads that failed to decode",
        ),
        &["kind"],
    )
    .unwrap()
});

// =============================================================================
// Datasets
// =============================================================================

/// Dataset loads by dataset and result.
pub static DATASET_LOADS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pokedex_dataset_loads_total", "Total dataset load attempts"),
        &["dataset", "result"], // "success", "failure"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(CACHE_LOOKUPS.clone()),
        Box::new(ASSET_FETCHES.clone()),
        Box::new(ASSET_FETCH_DURATION.clone()),
        Box::new(DECODE_FAILURES.clone()),
        Box::new(DATASET_LOADS.clone()),
    ]
}

/// Register every metric in `registry`.
///
/// Panics if any of them is already registered there; [`REGISTRY`] calls
/// this exactly once.
pub fn register_metrics(registry: &Registry) {
    // Cache
    registry
        .register(Box::new(CACHE_LOOKUPS.clone()))
        .expect("cache lookups registered twice");

    // Fetches
    registry
        .register(Box::new(ASSET_FETCHES.clone()))
        .expect("asset fetches registered twice");
    registry
        .register(Box::new(ASSET_FETCH_DURATION.clone()))
        .expect("asset fetch duration registered twice");
    registry
        .register(Box::new(DECODE_FAILURES.clone()))
        .expect("decode failures registered twice");

    // Datasets
    registry
        .register(Box::new(DATASET_LOADS.clone()))
        .expect("dataset loads registered twice");
}

/// Encode [`REGISTRY`] in the Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_contains_recorded_metric() {
        CACHE_LOOKUPS
            .with_label_values(&["Pokemon Sprites", "hit"])
            .inc();
        let text = encode_metrics();
        assert!(text.contains("pokedex_cache_lookups_total"));
    }

    #[test]
    fn test_register_metrics_in_fresh_registry() {
        let registry = Registry::new();
        register_metrics(&registry);

        DATASET_LOADS.with_label_values(&["entries", "success"]).inc();
        let names: Vec<_> = registry
            .gather()
            .iter()
            .map(|family| family.get_name().to_string())
            .collect();
        assert!(names.contains(&"pokedex_dataset_loads_total".to_string()));
    }

    #[test]
    fn test_all_metrics_reject_duplicate_registration() {
        let registry = Registry::new();
        register_metrics(&registry);
        for metric in all_metrics() {
            assert!(registry.register(metric).is_err());
        }
    }
}
