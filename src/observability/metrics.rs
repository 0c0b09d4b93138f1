use anyhow::Result;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use tracing::info;
use std::sync::Arc;
use tokio::sync::OnceCell;


// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the process-wide `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE.get_or_init(|| async {
        info!("Initializing Metrics ...");
        Metrics::new()}
    ).await
}


#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Refresh metrics
    pub refresh_requests: IntCounter,
    pub refresh_failures: IntCounterVec,
    pub refresh_duration: Histogram,

    // Cache metrics
    pub cache_hits: IntCounter,
    pub credential_expiry_unix: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("translatorauth".into()), None).expect("metrics registry");

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Refresh
            refresh_requests: IntCounter::new("credential_refresh_requests_total", "Total credential refresh attempts").expect("metric"),
            refresh_failures: IntCounterVec::new(Opts::new("credential_refresh_failures_total", "Refresh failures by reason"), &["reason"]).expect("metric"),
            refresh_duration: Histogram::with_opts(HistogramOpts::new("credential_refresh_duration_seconds", "Refresh duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0])).expect("metric"),

            // Cache
            cache_hits: IntCounter::new("credential_cache_hits_total", "Requests served from the cached credential").expect("metric"),
            credential_expiry_unix: IntGauge::new("credential_expiry_unix_seconds", "Expiry of the most recently fetched credential").expect("metric"),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.refresh_requests.clone())).expect("register metric");
        reg.register(Box::new(metrics.refresh_failures.clone())).expect("register metric");
        reg.register(Box::new(metrics.refresh_duration.clone())).expect("register metric");
        reg.register(Box::new(metrics.cache_hits.clone())).expect("register metric");
        reg.register(Box::new(metrics.credential_expiry_unix.clone())).expect("register metric");

        metrics
    }

    /// Prometheus text exposition of everything in the registry.
    pub fn encode_text(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
