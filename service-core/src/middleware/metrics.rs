use axum::{extract::MatchedPath, extract::Request, middleware::Next, response::Response};
use prometheus::{HistogramVec, register_histogram_vec};
use std::sync::OnceLock;
use std::time::Instant;

static HTTP_REQUEST_DURATION: OnceLock<Option<HistogramVec>> = OnceLock::new();

fn request_duration() -> Option<&'static HistogramVec> {
    HTTP_REQUEST_DURATION
        .get_or_init(|| {
            register_histogram_vec!(
                "http_request_duration_seconds",
                "HTTP request latency by route",
                &["method", "path", "status"]
            )
            .map_err(|e| tracing::warn!(error = %e, "HTTP latency histogram not registered"))
            .ok()
        })
        .as_ref()
}

/// Records `http_request_duration_seconds` per route into the default
/// prometheus registry.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    // Label by route template so unmatched paths share one series.
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;

    if let Some(histogram) = request_duration() {
        let status = response.status().as_u16().to_string();
        histogram
            .with_label_values(&[method.as_str(), path.as_str(), status.as_str()])
            .observe(start.elapsed().as_secs_f64());
    }

    response
}
