use anyhow::Result;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;


// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE.get_or_init(|| async {
        info!("Initializing Metrics ...");
        Metrics::new()}
    ).await
}

/// Text exposition of everything registered so far.
pub async fn render() -> Result<String> {
    let metrics = get_metrics().await;
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&metrics.registry.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}


#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Outbound request metrics
    pub requests: IntCounterVec,
    pub request_failures: IntCounterVec,
    pub request_duration: HistogramVec,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("tokenconsole".into()), None).expect("static registry prefix");

        let metrics: Arc<Metrics> = Arc::new(Self {
            requests: IntCounterVec::new(Opts::new("requests_total", "Total outbound requests by method and path"),&["method", "path"],).expect("requests_total definition"),
            request_failures: IntCounterVec::new(Opts::new("request_failures_total", "Outbound request failures by reason"),&["method", "path", "reason"],).expect("request_failures_total definition"),
            request_duration: HistogramVec::new(HistogramOpts::new("request_duration_seconds", "Outbound request duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),&["method", "path"],).expect("request_duration_seconds definition"),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.requests.clone())).expect("register requests_total");
        reg.register(Box::new(metrics.request_failures.clone())).expect("register request_failures_total");
        reg.register(Box::new(metrics.request_duration.clone())).expect("register request_duration_seconds");

        metrics
    }
}
