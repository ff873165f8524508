//! HTTP handlers for tenant-billing-service.
//!
//! Money travels as decimal strings and dates as `YYYY-MM-DD`; anything that
//! fails to parse is reported as a 400.

pub mod billing;
pub mod invoice;

use axum::{routing::post, Router};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use service_core::error::AppError;
use std::str::FromStr;

use crate::error::BillingError;
use crate::models::Locale;
use crate::services::{record_error, record_http_request};
use crate::startup::AppState;

/// Billing API routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/billing/quote", post(billing::quote))
        .route("/billing/next-payment-date", post(billing::next_payment_date))
        .route(
            "/billing/period-description",
            post(billing::period_description),
        )
        .route("/billing/invoice-numbers", post(invoice::create_invoice_number))
}

pub(crate) fn parse_decimal(field: &str, s: &str) -> Result<Decimal, BillingError> {
    Decimal::from_str(s.trim())
        .map_err(|_| BillingError::invalid(format!("Invalid decimal for {}: {}", field, s)))
}

pub(crate) fn parse_date(field: &str, s: &str) -> Result<NaiveDate, BillingError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| BillingError::invalid(format!("Invalid date for {}: {}", field, s)))
}

pub(crate) fn parse_locale(raw: Option<&str>, default: Locale) -> Result<Locale, BillingError> {
    match raw {
        Some(s) if !s.trim().is_empty() => s.parse(),
        _ => Ok(default),
    }
}

/// Count the failure and convert it for the response.
pub(crate) fn reject(endpoint: &str, err: BillingError) -> AppError {
    tracing::warn!(endpoint = endpoint, error = %err, "Billing request rejected");
    record_error(err.kind(), endpoint);
    let err = AppError::from(err);
    record_http_request(endpoint, err.status_code().as_u16());
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(
            parse_decimal("monthly_fee", " 100.50 ").unwrap(),
            Decimal::new(10050, 2)
        );
        assert!(parse_decimal("monthly_fee", "ten").is_err());
        assert!(parse_decimal("monthly_fee", "").is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("join_date", "2025-03-10").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
        );
        assert!(parse_date("join_date", "2025-01-32").is_err());
        assert!(parse_date("join_date", "2025-02-29").is_err());
        assert!(parse_date("join_date", "10/03/2025").is_err());
    }

    #[test]
    fn test_parse_locale_falls_back_to_default() {
        assert_eq!(parse_locale(None, Locale::Arabic).unwrap(), Locale::Arabic);
        assert_eq!(parse_locale(Some(""), Locale::English).unwrap(), Locale::English);
        assert_eq!(parse_locale(Some("ar"), Locale::English).unwrap(), Locale::Arabic);
        assert!(parse_locale(Some("de"), Locale::English).is_err());
    }
}
