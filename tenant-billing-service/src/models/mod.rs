//! Domain models for tenant-billing-service.

mod billing;
mod locale;

pub use billing::BillingPeriodDescriptor;
pub use locale::Locale;
