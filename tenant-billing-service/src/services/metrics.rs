//! Metrics module for tenant-billing-service.
//! Provides Prometheus metrics for billing calculations and invoice numbering.

use prometheus::{
    histogram_opts, opts, register_histogram, register_int_counter_vec, Encoder, Histogram,
    IntCounterVec, TextEncoder,
};
use std::sync::OnceLock;

/// Billing calculations by outcome and whether proration applied
pub static BILLING_CALCULATIONS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Invoice numbers issued by outcome
pub static INVOICE_NUMBERS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// HTTP requests by endpoint and status
pub static HTTP_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Error counter for alerting
pub static ERRORS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Distribution of first payment amounts
pub static FIRST_PAYMENT_AMOUNT: OnceLock<Histogram> = OnceLock::new();

/// Initialize all metrics. Safe to call more than once.
pub fn init_metrics() {
    BILLING_CALCULATIONS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!(
                "billing_calculations_total",
                "Total tenant billing calculations by outcome"
            ),
            &["outcome", "prorated"]
        )
        .expect("Failed to register BILLING_CALCULATIONS_TOTAL")
    });

    INVOICE_NUMBERS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!(
                "billing_invoice_numbers_total",
                "Total invoice numbers issued by outcome"
            ),
            &["outcome"]
        )
        .expect("Failed to register INVOICE_NUMBERS_TOTAL")
    });

    HTTP_REQUESTS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!("billing_http_requests_total", "Total HTTP API requests"),
            &["endpoint", "status"]
        )
        .expect("Failed to register HTTP_REQUESTS_TOTAL")
    });

    ERRORS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!("billing_errors_total", "Total errors by type for alerting"),
            &["error_type", "endpoint"]
        )
        .expect("Failed to register ERRORS_TOTAL")
    });

    FIRST_PAYMENT_AMOUNT.get_or_init(|| {
        register_histogram!(histogram_opts!(
            "billing_first_payment_amount",
            "First payment amount charged to new tenants",
            vec![0.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 5000.0]
        ))
        .expect("Failed to register FIRST_PAYMENT_AMOUNT")
    });
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Record a billing calculation.
pub fn record_billing_calculation(outcome: &str, prorated: bool) {
    if let Some(counter) = BILLING_CALCULATIONS_TOTAL.get() {
        let prorated = if prorated { "true" } else { "false" };
        counter.with_label_values(&[outcome, prorated]).inc();
    }
}

/// Record a first payment amount.
pub fn record_first_payment(amount: f64) {
    if let Some(histogram) = FIRST_PAYMENT_AMOUNT.get() {
        histogram.observe(amount);
    }
}

/// Record an invoice number request.
pub fn record_invoice_number(outcome: &str) {
    if let Some(counter) = INVOICE_NUMBERS_TOTAL.get() {
        counter.with_label_values(&[outcome]).inc();
    }
}

/// Record an HTTP API request.
pub fn record_http_request(endpoint: &str, status: u16) {
    if let Some(counter) = HTTP_REQUESTS_TOTAL.get() {
        let status = status.to_string();
        counter
            .with_label_values(&[endpoint, status.as_str()])
            .inc();
    }
}

/// Record an error for alerting.
pub fn record_error(error_type: &str, endpoint: &str) {
    if let Some(counter) = ERRORS_TOTAL.get() {
        counter.with_label_values(&[error_type, endpoint]).inc();
    }
}
