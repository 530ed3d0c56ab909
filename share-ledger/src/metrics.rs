//! Metrics collection for observability
//!
//! This module provides Prometheus metrics for monitoring the contract.
//!
//! # Metrics
//!
//! - `share_ledger_invocations_total{function, outcome}` - Invocations by result
//! - `share_ledger_commit_keys` - Histogram of committed write-set sizes

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Metrics collector
///
/// Each collector owns its registry, so several contracts can live in one
/// process.
#[derive(Clone)]
pub struct Metrics {
    /// Invocations by function and outcome (`ok` or an error kind)
    pub invocations_total: IntCounterVec,

    /// Keys written per committed transaction
    pub commit_keys: Histogram,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics").finish_non_exhaustive()
    }
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let invocations_total = IntCounterVec::new(
            Opts::new(
                "share_ledger_invocations_total",
                "Total number of invocations by function and outcome",
            ),
            &["function", "outcome"],
        )?;
        registry.register(Box::new(invocations_total.clone()))?;

        let commit_keys = Histogram::with_opts(
            HistogramOpts::new(
                "share_ledger_commit_keys",
                "Histogram of keys written per committed transaction",
            )
            .buckets(vec![0.0, 1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0]),
        )?;
        registry.register(Box::new(commit_keys.clone()))?;

        Ok(Self {
            invocations_total,
            commit_keys,
            registry,
        })
    }

    /// Record one invocation outcome
    pub fn record_invocation(&self, function: &str, outcome: &str) {
        self.invocations_total
            .with_label_values(&[function, outcome])
            .inc();
    }

    /// Record a committed transaction
    pub fn record_commit(&self, keys: usize) {
        self.commit_keys.observe(keys as f64);
    }

    /// Export metrics in Prometheus text format
    pub fn export(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::warn!("Failed to encode metrics: {}", e);
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}
