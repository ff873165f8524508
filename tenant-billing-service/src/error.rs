//! Error types for billing calculations.

use service_core::error::AppError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BillingError {
    /// Negative fee, malformed or out-of-range date, malformed invoice number.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Every 4-digit suffix under this prefix has been handed out.
    #[error("No invoice numbers left for {prefix}")]
    InvoiceNumbersExhausted { prefix: String },

    /// The generator already tracks as many prefixes as it is allowed to.
    #[error("Invoice number capacity reached ({limit} prefixes tracked)")]
    InvoicePrefixLimit { limit: usize },
}

impl BillingError {
    pub fn invalid(message: impl Into<String>) -> Self {
        BillingError::InvalidArgument(message.into())
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            BillingError::InvalidArgument(_) => "invalid_argument",
            BillingError::InvoiceNumbersExhausted { .. } => "invoice_numbers_exhausted",
            BillingError::InvoicePrefixLimit { .. } => "invoice_prefix_limit",
        }
    }
}

impl From<BillingError> for AppError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::InvalidArgument(_) => AppError::BadRequest(anyhow::Error::new(err)),
            BillingError::InvoiceNumbersExhausted { .. } => {
                AppError::Conflict(anyhow::Error::new(err))
            }
            BillingError::InvoicePrefixLimit { .. } => AppError::ServiceUnavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_invalid_argument_maps_to_bad_request() {
        let err: AppError = BillingError::invalid("monthly fee must not be negative").into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("monthly fee must not be negative"));
    }

    #[test]
    fn test_exhausted_maps_to_conflict() {
        let err: AppError = BillingError::InvoiceNumbersExhausted {
            prefix: "INV-202501-ABCDEF12".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_prefix_limit_maps_to_unavailable() {
        let err = BillingError::InvoicePrefixLimit { limit: 10 };
        assert_eq!(err.kind(), "invoice_prefix_limit");
        let err: AppError = err.into();
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
