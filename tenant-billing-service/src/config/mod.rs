//! Configuration module for tenant-billing-service.

use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

use crate::models::Locale;
use crate::services::invoice::DEFAULT_MAX_PREFIXES;

#[derive(Debug, Clone)]
pub struct BillingConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub billing: BillingDefaults,
}

/// Defaults applied when a request leaves a field out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingDefaults {
    /// ISO 4217 code reported alongside amounts. Default `USD`.
    pub currency: String,
    /// Language of period descriptions. Default English.
    pub locale: Locale,
    /// Upper bound on `INV-{YYYY}{MM}-{TENANT8}` prefixes the invoice number
    /// generator tracks. Default 10000.
    pub max_invoice_prefixes: usize,
}

impl Default for BillingDefaults {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            locale: Locale::English,
            max_invoice_prefixes: DEFAULT_MAX_PREFIXES,
        }
    }
}

impl BillingConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let locale = match env::var("BILLING_LOCALE") {
            Ok(raw) => raw.parse().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("BILLING_LOCALE is invalid: {}", e))
            })?,
            Err(_) => Locale::default(),
        };

        let currency = env::var("BILLING_CURRENCY")
            .map(|c| c.trim().to_ascii_uppercase())
            .unwrap_or_else(|_| BillingDefaults::default().currency);
        if currency.len() != 3 || !currency.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "BILLING_CURRENCY must be a 3-letter code, got '{}'",
                currency
            )));
        }

        let max_invoice_prefixes = match env::var("BILLING_MAX_INVOICE_PREFIXES") {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(AppError::ConfigError(anyhow::anyhow!(
                        "BILLING_MAX_INVOICE_PREFIXES must be a positive integer, got '{}'",
                        raw
                    )))
                }
            },
            Err(_) => DEFAULT_MAX_PREFIXES,
        };

        Ok(Self {
            common,
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "tenant-billing-service".to_string()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            billing: BillingDefaults {
                currency,
                locale,
                max_invoice_prefixes,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_billing_defaults() {
        let defaults = BillingDefaults::default();
        assert_eq!(defaults.currency, "USD");
        assert_eq!(defaults.locale, Locale::English);
        assert_eq!(defaults.max_invoice_prefixes, 10_000);
    }
}
