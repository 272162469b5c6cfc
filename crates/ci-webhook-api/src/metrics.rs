//! Prometheus metrics for the webhook service.

use prometheus::{
    Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::Duration;

/// Label used for event kinds outside the known set, keeping label
/// cardinality bounded.
pub const OTHER_EVENT_LABEL: &str = "other";

/// Service metrics for observability
///
/// Each instance owns its registry so several routers can coexist in one
/// process (tests build many).
pub struct ServiceMetrics {
    registry: Registry,

    pub webhook_requests_total: IntCounterVec,
    pub webhook_signature_failures_total: IntCounter,
    pub webhook_duration_seconds: Histogram,
}

impl ServiceMetrics {
    pub fn new() -> Result<Arc<Self>, prometheus::Error> {
        let registry = Registry::new();

        let webhook_requests_total = IntCounterVec::new(
            Opts::new(
                "webhook_requests_total",
                "Total webhook requests received by event kind",
            ),
            &["event"],
        )?;
        let webhook_signature_failures_total = IntCounter::new(
            "webhook_signature_failures_total",
            "Webhook requests rejected by signature verification",
        )?;
        let webhook_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "webhook_duration_seconds",
                "Webhook processing time distribution",
            )
            .buckets(vec![0.001, 0.01, 0.1, 0.5, 1.0, 2.0, 5.0]),
        )?;

        registry.register(Box::new(webhook_requests_total.clone()))?;
        registry.register(Box::new(webhook_signature_failures_total.clone()))?;
        registry.register(Box::new(webhook_duration_seconds.clone()))?;

        Ok(Arc::new(Self {
            registry,
            webhook_requests_total,
            webhook_signature_failures_total,
            webhook_duration_seconds,
        }))
    }

    /// Record one webhook request.
    ///
    /// `event` should already be reduced to a bounded label set.
    pub fn record_webhook_request(&self, event: &str, duration: Duration, authenticated: bool) {
        self.webhook_requests_total.with_label_values(&[event]).inc();
        self.webhook_duration_seconds.observe(duration.as_secs_f64());
        if !authenticated {
            self.webhook_signature_failures_total.inc();
        }
    }

    /// Render all metrics in the Prometheus text exposition format
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        TextEncoder::new().encode_to_string(&self.registry.gather())
    }
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
