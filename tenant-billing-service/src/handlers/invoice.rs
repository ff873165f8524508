//! Invoice number handlers.

use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use service_core::utils::ValidatedJson;
use tracing::instrument;
use validator::Validate;

use super::{parse_date, reject};
use crate::services::{record_http_request, record_invoice_number};
use crate::startup::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvoiceNumberRequest {
    #[validate(length(min = 1, max = 128, message = "tenant_id must be 1-128 characters"))]
    pub tenant_id: String,
    /// Invoice date; today (UTC) when omitted.
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateInvoiceNumberResponse {
    pub invoice_number: String,
}

/// Issue an invoice number unique within this service instance.
///
/// POST /billing/invoice-numbers
#[instrument(skip(state))]
pub async fn create_invoice_number(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateInvoiceNumberRequest>,
) -> Result<(StatusCode, Json<CreateInvoiceNumberResponse>), AppError> {
    const ENDPOINT: &str = "invoice_numbers";

    let date = match req.date.as_deref() {
        Some(raw) => parse_date("date", raw).map_err(|e| reject(ENDPOINT, e))?,
        None => Utc::now().date_naive(),
    };

    let invoice_number = state
        .invoice_numbers
        .next(&req.tenant_id, date)
        .map_err(|e| {
            record_invoice_number("error");
            reject(ENDPOINT, e)
        })?;

    record_invoice_number("success");
    record_http_request(ENDPOINT, StatusCode::CREATED.as_u16());

    tracing::info!(
        tenant_id = %req.tenant_id,
        invoice_number = %invoice_number,
        "Invoice number issued"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateInvoiceNumberResponse { invoice_number }),
    ))
}
