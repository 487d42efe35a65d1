//! Query metrics (feature `metrics`) and tracing helpers (feature `tracing`).

#[cfg(feature = "metrics")]
pub use self::otel::{QueryChainMetrics, METRICS};

#[cfg(feature = "metrics")]
mod otel {
    use once_cell::sync::Lazy;
    use opentelemetry::{
        metrics::{Counter, Histogram, MeterProvider},
        KeyValue,
    };
    use opentelemetry_prometheus::PrometheusExporter;
    use opentelemetry_sdk::metrics::SdkMeterProvider;
    use prometheus::Registry;

    pub static METRICS: Lazy<QueryChainMetrics> = Lazy::new(QueryChainMetrics::init);

    pub struct QueryChainMetrics {
        pub registry: Registry,
        pub exporter: Option<PrometheusExporter>,
        pub queries_total: Counter<u64>,
        pub query_errors_total: Counter<u64>,
        pub query_duration: Histogram<f64>,
        pub cache_misses_total: Counter<u64>,
        _provider: SdkMeterProvider,
    }

    impl QueryChainMetrics {
        pub fn init() -> Self {
            let registry = Registry::new();
            let exporter = match opentelemetry_prometheus::exporter()
                .with_registry(registry.clone())
                .build()
            {
                Ok(exporter) => Some(exporter),
                Err(e) => {
                    log::warn!("Prometheus exporter unavailable, metrics will not be exported: {e}");
                    None
                }
            };

            let mut builder = SdkMeterProvider::builder();
            if let Some(exporter) = &exporter {
                builder = builder.with_reader(exporter.clone());
            }
            let provider = builder.build();
            let meter = provider.meter("querychain");

            let queries_total = meter
                .u64_counter("querychain_queries_total")
                .with_description("Total statements handed to the executor")
                .build();

            let query_errors_total = meter
                .u64_counter("querychain_query_errors_total")
                .with_description("Statements the executor failed")
                .build();

            let query_duration = meter
                .f64_histogram("querychain_query_duration_seconds")
                .with_description("Executor round-trip duration")
                .build();

            let cache_misses_total = meter
                .u64_counter("querychain_resolution_cache_misses_total")
                .with_description("Entity metadata and accessor column cache misses")
                .build();

            Self {
                registry,
                exporter,
                queries_total,
                query_errors_total,
                query_duration,
                cache_misses_total,
                _provider: provider,
            }
        }

        pub fn record_query(&self, kind: &'static str, elapsed: std::time::Duration) {
            let attrs = [KeyValue::new("kind", kind)];
            self.queries_total.add(1, &attrs);
            self.query_duration.record(elapsed.as_secs_f64(), &attrs);
        }

        pub fn record_query_error(&self, kind: &'static str) {
            self.query_errors_total.add(1, &[KeyValue::new("kind", kind)]);
        }

        pub fn record_cache_miss(&self, cache: &'static str) {
            self.cache_misses_total.add(1, &[KeyValue::new("cache", cache)]);
        }
    }
}

#[cfg(feature = "tracing")]
pub mod tracing_helpers {
    /// Span entered around one executor call
    pub fn execute_query_span(sql: &str, kind: &'static str) -> tracing::Span {
        tracing::debug_span!("querychain.execute", sql = %sql, kind = kind)
    }
}
