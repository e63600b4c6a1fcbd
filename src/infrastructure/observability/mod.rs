//! Observability infrastructure - Prometheus metrics

mod metrics;

pub use self::metrics::{
    create_metrics_router, init_metrics, record_file_retrieval, record_http_request,
    record_key_validation, PrometheusMetrics,
};
