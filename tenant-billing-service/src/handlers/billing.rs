//! Billing calculation handlers.

use axum::extract::{Json, State};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use service_core::utils::ValidatedJson;
use tracing::instrument;
use validator::Validate;

use super::{parse_date, parse_decimal, parse_locale, reject};
use crate::models::{BillingPeriodDescriptor, Locale};
use crate::services::{
    calculate_next_payment_date, calculate_tenant_billing_with_locale,
    localized_payment_period_description, record_billing_calculation, record_first_payment,
    record_http_request,
};
use crate::startup::AppState;

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Quote the first payment for a tenant.
#[derive(Debug, Deserialize, Validate)]
pub struct QuoteRequest {
    pub monthly_fee: String,
    pub join_date: String,
    pub locale: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    #[serde(flatten)]
    pub billing: BillingPeriodDescriptor,
    pub currency: String,
    pub locale: Locale,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NextPaymentDateRequest {
    pub current_date: String,
    #[serde(default)]
    pub is_first_payment: bool,
}

#[derive(Debug, Serialize)]
pub struct NextPaymentDateResponse {
    pub next_payment_date: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PeriodDescriptionRequest {
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub is_prorated: bool,
    pub locale: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PeriodDescriptionResponse {
    pub description: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Quote the first billing period for a tenant.
///
/// POST /billing/quote
#[instrument(skip(state))]
pub async fn quote(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<QuoteRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    const ENDPOINT: &str = "quote";

    let monthly_fee = parse_decimal("monthly_fee", &req.monthly_fee)
        .map_err(|e| reject(ENDPOINT, e))?;
    let join_date = parse_date("join_date", &req.join_date).map_err(|e| reject(ENDPOINT, e))?;
    let locale = parse_locale(req.locale.as_deref(), state.config.billing.locale)
        .map_err(|e| reject(ENDPOINT, e))?;

    let billing = calculate_tenant_billing_with_locale(monthly_fee, join_date, locale)
        .map_err(|e| {
            record_billing_calculation("error", false);
            reject(ENDPOINT, e)
        })?;

    record_billing_calculation("success", billing.is_prorated);
    if let Some(amount) = billing.amount.to_f64() {
        record_first_payment(amount);
    }
    record_http_request(ENDPOINT, 200);

    tracing::info!(
        join_date = %join_date,
        amount = %billing.amount,
        is_prorated = billing.is_prorated,
        "Tenant billing quoted"
    );

    Ok(Json(QuoteResponse {
        billing,
        currency: state.config.billing.currency.clone(),
        locale,
    }))
}

/// Due date of the next payment.
///
/// POST /billing/next-payment-date
#[instrument]
pub async fn next_payment_date(
    ValidatedJson(req): ValidatedJson<NextPaymentDateRequest>,
) -> Result<Json<NextPaymentDateResponse>, AppError> {
    const ENDPOINT: &str = "next_payment_date";

    let current_date =
        parse_date("current_date", &req.current_date).map_err(|e| reject(ENDPOINT, e))?;
    let next = calculate_next_payment_date(current_date, req.is_first_payment)
        .map_err(|e| reject(ENDPOINT, e))?;

    record_http_request(ENDPOINT, 200);

    Ok(Json(NextPaymentDateResponse {
        next_payment_date: next.format("%Y-%m-%d").to_string(),
    }))
}

/// Human-readable billing period.
///
/// POST /billing/period-description
#[instrument(skip(state))]
pub async fn period_description(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<PeriodDescriptionRequest>,
) -> Result<Json<PeriodDescriptionResponse>, AppError> {
    const ENDPOINT: &str = "period_description";

    let start = parse_date("start_date", &req.start_date).map_err(|e| reject(ENDPOINT, e))?;
    let end = parse_date("end_date", &req.end_date).map_err(|e| reject(ENDPOINT, e))?;
    let locale = parse_locale(req.locale.as_deref(), state.config.billing.locale)
        .map_err(|e| reject(ENDPOINT, e))?;

    record_http_request(ENDPOINT, 200);

    Ok(Json(PeriodDescriptionResponse {
        description: localized_payment_period_description(start, end, req.is_prorated, locale),
    }))
}
