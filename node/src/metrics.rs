//! # Prometheus Metrics
//!
//! Authentication outcomes and verification latency, scraped by Prometheus
//! at `/metrics` on the metrics port.
//!
//! Rejection reasons are recorded here and in logs only. The HTTP response
//! for every rejected token is identical.
//!
//! All metrics are registered in a dedicated [`prometheus::Registry`] so they
//! do not collide with any default global registry consumers.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Outcome label for requests that never reached the verifier.
pub const MISSING_CREDENTIALS: &str = "missing_credentials";

/// Holds all Prometheus metric handles for the node.
///
/// Clone-friendly (prometheus handles are `Arc`s internally) so it can be
/// shared across request handlers.
#[derive(Clone)]
pub struct AuthMetrics {
    /// Prometheus registry that owns all metrics below.
    registry: Registry,
    /// Tokens accepted by the verifier.
    pub auth_accepted_total: IntCounter,
    /// Requests refused, labelled by reason.
    pub auth_rejected_total: IntCounterVec,
    /// Time spent inside the verifier, in seconds.
    pub verification_latency_seconds: Histogram,
}

impl AuthMetrics {
    /// Creates and registers all metrics. Call once at startup.
    pub fn new() -> Self {
        let registry = Registry::new_custom(Some("wallet_auth".into()), None)
            .expect("failed to create prometheus registry");

        let auth_accepted_total =
            IntCounter::new("auth_accepted_total", "Bearer tokens accepted")
                .expect("metric creation");
        registry
            .register(Box::new(auth_accepted_total.clone()))
            .expect("metric registration");

        let auth_rejected_total = IntCounterVec::new(
            Opts::new("auth_rejected_total", "Requests refused, by reason"),
            &["reason"],
        )
        .expect("metric creation");
        registry
            .register(Box::new(auth_rejected_total.clone()))
            .expect("metric registration");

        let verification_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "verification_latency_seconds",
                "Bearer token verification latency in seconds",
            )
            .buckets(vec![
                0.00001, 0.00005, 0.0001, 0.00025, 0.0005, 0.001, 0.005, 0.01,
            ]),
        )
        .expect("metric creation");
        registry
            .register(Box::new(verification_latency_seconds.clone()))
            .expect("metric registration");

        Self {
            registry,
            auth_accepted_total,
            auth_rejected_total,
            verification_latency_seconds,
        }
    }

    pub fn record_accepted(&self) {
        self.auth_accepted_total.inc();
    }

    pub fn record_rejected(&self, reason: &str) {
        self.auth_rejected_total.with_label_values(&[reason]).inc();
    }

    /// Encodes all registered metrics into the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl Default for AuthMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared metrics state passed to axum handlers.
pub type SharedMetrics = Arc<AuthMetrics>;

/// Axum handler that renders `/metrics` in Prometheus text format.
pub async fn metrics_handler(
    axum::extract::State(metrics): axum::extract::State<SharedMetrics>,
) -> impl IntoResponse {
    match metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics encoding failed").into_response()
        }
    }
}
