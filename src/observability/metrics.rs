// ============================================================================
// PROMETHEUS METRICS - Sistema de Observabilidad
// ============================================================================
// Métricas expuestas en /metrics (formato texto de Prometheus)
// ============================================================================

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec,
};

lazy_static! {
    // ========================================================================
    // HTTP REQUEST METRICS
    // ========================================================================

    /// Total de requests HTTP por path y status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["path", "status"]
    )
    .unwrap();

    /// Latencia de requests HTTP en segundos
    pub static ref HTTP_REQUEST_LATENCY_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_latency_seconds",
        "HTTP request latency in seconds",
        &["path"],
        vec![0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0]
    )
    .unwrap();

    // ========================================================================
    // WEBHOOK METRICS
    // ========================================================================

    /// Resultado de cada llamada al webhook
    pub static ref WEBHOOK_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "webhook_requests_total",
        "Total number of webhook requests by result",
        &["result"]
    )
    .unwrap();

    // ========================================================================
    // DATABASE METRICS
    // ========================================================================

    /// Total de queries ejecutadas
    pub static ref DB_QUERIES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "db_queries_total",
        "Total number of database queries",
        &["query_type", "table", "status"]
    )
    .unwrap();

    /// Duración de queries en segundos
    pub static ref DB_QUERY_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "db_query_duration_seconds",
        "Database query duration in seconds",
        &["query_type", "table"],
        vec![0.0005, 0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0]
    )
    .unwrap();
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Helper para registrar una request HTTP
pub fn record_http_request(path: &str, status: u16, duration_secs: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[path, &status.to_string()])
        .inc();

    HTTP_REQUEST_LATENCY_SECONDS
        .with_label_values(&[path])
        .observe(duration_secs);
}

/// Helper para registrar el resultado de un webhook
pub fn record_webhook_result(result: &str) {
    WEBHOOK_REQUESTS_TOTAL.with_label_values(&[result]).inc();
}

/// Helper para registrar una query de base de datos
pub fn record_db_query(query_type: &str, table: &str, duration_secs: f64, success: bool) {
    let status = if success { "success" } else { "error" };

    DB_QUERIES_TOTAL
        .with_label_values(&[query_type, table, status])
        .inc();

    DB_QUERY_DURATION_SECONDS
        .with_label_values(&[query_type, table])
        .observe(duration_secs);
}
