//! First-period billing result.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What a tenant owes for its first billing period and when the next
/// payment falls due.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPeriodDescriptor {
    /// First payment amount, prorated when `is_prorated`.
    pub amount: Decimal,
    pub is_prorated: bool,
    /// Human-readable period, e.g. "March 10-31, 2025 (Prorated)".
    pub period_label: String,
    pub next_due_date: NaiveDate,
    /// Every later period is billed at the full monthly fee.
    pub next_payment_amount: Decimal,
    /// Billable days in the first period, join day included. Prorated only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_in_period: Option<u32>,
    /// Length of the join month. Prorated only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_days_in_month: Option<u32>,
}
