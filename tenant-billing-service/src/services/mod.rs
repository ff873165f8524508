//! Services module for tenant-billing-service.

pub mod calculator;
pub mod invoice;
pub mod metrics;

pub use calculator::{
    calculate_next_payment_date, calculate_prorated_amount, calculate_tenant_billing,
    calculate_tenant_billing_with_locale, localized_payment_period_description,
    needs_prorated_payment, payment_period_description,
};
pub use invoice::{
    generate_invoice_number, parse_invoice_number, InvoiceNumberGenerator, InvoiceNumberParts,
};
pub use metrics::{
    get_metrics, init_metrics, record_billing_calculation, record_error, record_first_payment,
    record_http_request, record_invoice_number,
};
