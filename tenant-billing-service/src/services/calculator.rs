//! Prorated subscription billing for tenants.
//!
//! A tenant joining mid-month pays only for the days left in the join month,
//! then the full monthly fee from the 1st of the following month. Joining on
//! the 1st is never prorated.
//!
//! All functions here are pure: no I/O, no shared state.

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::BillingError;
use crate::models::{BillingPeriodDescriptor, Locale};

/// Money is kept to cents.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Round half-up to cents.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Build a date from calendar fields, rejecting impossible ones (day 32,
/// February 30, month 13).
pub fn calendar_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, BillingError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        BillingError::invalid(format!(
            "Invalid calendar date: {:04}-{:02}-{:02}",
            year, month, day
        ))
    })
}

/// Number of days in the month containing `date` (28-31).
pub fn days_in_month(date: NaiveDate) -> u32 {
    match date.month() {
        2 if date.leap_year() => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Billable days from `date` to the end of its month, `date` included.
pub fn remaining_days_in_month(date: NaiveDate) -> u32 {
    days_in_month(date) - date.day() + 1
}

/// Last calendar day of the month containing `date`.
pub fn last_day_of_month(date: NaiveDate) -> Result<NaiveDate, BillingError> {
    date.with_day(days_in_month(date))
        .ok_or_else(|| BillingError::invalid(format!("No month end for {}", date)))
}

fn ensure_non_negative(monthly_amount: Decimal) -> Result<(), BillingError> {
    if monthly_amount.is_sign_negative() && !monthly_amount.is_zero() {
        return Err(BillingError::invalid(format!(
            "Monthly fee must not be negative: {}",
            monthly_amount
        )));
    }
    Ok(())
}

/// Fee owed for the rest of the join month.
///
/// `monthly_amount / days_in_month * remaining_days`, rounded half-up to
/// cents once at the end.
pub fn calculate_prorated_amount(
    monthly_amount: Decimal,
    join_date: NaiveDate,
) -> Result<Decimal, BillingError> {
    ensure_non_negative(monthly_amount)?;

    let total_days = Decimal::from(days_in_month(join_date));
    let remaining_days = Decimal::from(remaining_days_in_month(join_date));

    let amount = monthly_amount
        .checked_div(total_days)
        .and_then(|daily_rate| daily_rate.checked_mul(remaining_days))
        .ok_or_else(|| {
            BillingError::invalid(format!("Monthly fee out of range: {}", monthly_amount))
        })?;

    Ok(round_money(amount))
}

/// Joining on the 1st is billed as a full month; any later day is prorated.
pub fn needs_prorated_payment(join_date: NaiveDate) -> bool {
    join_date.day() > 1
}

/// Due date of the payment after the one covering `current_date`.
///
/// A first (prorated) payment is followed by the 1st of the next month.
/// Renewals move one calendar month forward, clamped to the end of shorter
/// months: Jan 31 renews on Feb 28 (Feb 29 in leap years), Mar 31 on Apr 30.
pub fn calculate_next_payment_date(
    current_date: NaiveDate,
    is_first_payment: bool,
) -> Result<NaiveDate, BillingError> {
    let next = if is_first_payment {
        current_date
            .with_day(1)
            .and_then(|first| first.checked_add_months(Months::new(1)))
    } else {
        current_date.checked_add_months(Months::new(1))
    };

    next.ok_or_else(|| {
        BillingError::invalid(format!(
            "No payment date one month after {}",
            current_date
        ))
    })
}

/// English description of a billing period. See
/// [`localized_payment_period_description`].
pub fn payment_period_description(start: NaiveDate, end: NaiveDate, is_prorated: bool) -> String {
    localized_payment_period_description(start, end, is_prorated, Locale::English)
}

/// Human-readable billing period for invoices and receipts.
///
/// | prorated | same month | output                                    |
/// |----------|------------|-------------------------------------------|
/// | yes      | yes        | `March 10-31, 2025 (Prorated)`            |
/// | yes      | no         | `March 10 - April 9, 2025 (Prorated)`     |
/// | no       | yes        | `March 2025`                              |
/// | no       | no         | `January - February 2025`                 |
///
/// The year is always taken from `start`.
pub fn localized_payment_period_description(
    start: NaiveDate,
    end: NaiveDate,
    is_prorated: bool,
    locale: Locale,
) -> String {
    let same_month = start.year() == end.year() && start.month() == end.month();
    let start_month = locale.month_name(start);
    let end_month = locale.month_name(end);
    let year = start.year();

    match (is_prorated, same_month) {
        (true, true) => format!(
            "{} {}-{}, {} ({})",
            start_month,
            start.day(),
            end.day(),
            year,
            locale.prorated_label()
        ),
        (true, false) => format!(
            "{} {} - {} {}, {} ({})",
            start_month,
            start.day(),
            end_month,
            end.day(),
            year,
            locale.prorated_label()
        ),
        (false, true) => format!("{} {}", start_month, year),
        (false, false) => format!("{} - {} {}", start_month, end_month, year),
    }
}

/// First-period billing for a tenant joining on `join_date`, labelled in
/// English.
pub fn calculate_tenant_billing(
    monthly_fee: Decimal,
    join_date: NaiveDate,
) -> Result<BillingPeriodDescriptor, BillingError> {
    calculate_tenant_billing_with_locale(monthly_fee, join_date, Locale::English)
}

/// First-period billing for a tenant joining on `join_date`.
pub fn calculate_tenant_billing_with_locale(
    monthly_fee: Decimal,
    join_date: NaiveDate,
    locale: Locale,
) -> Result<BillingPeriodDescriptor, BillingError> {
    ensure_non_negative(monthly_fee)?;

    let period_end = last_day_of_month(join_date)?;

    let descriptor = if needs_prorated_payment(join_date) {
        BillingPeriodDescriptor {
            amount: calculate_prorated_amount(monthly_fee, join_date)?,
            is_prorated: true,
            period_label: localized_payment_period_description(
                join_date, period_end, true, locale,
            ),
            next_due_date: calculate_next_payment_date(join_date, true)?,
            next_payment_amount: monthly_fee,
            days_in_period: Some(remaining_days_in_month(join_date)),
            total_days_in_month: Some(days_in_month(join_date)),
        }
    } else {
        BillingPeriodDescriptor {
            amount: monthly_fee,
            is_prorated: false,
            period_label: localized_payment_period_description(
                join_date, period_end, false, locale,
            ),
            next_due_date: calculate_next_payment_date(join_date, false)?,
            next_payment_amount: monthly_fee,
            days_in_period: None,
            total_days_in_month: None,
        }
    };

    tracing::debug!(
        join_date = %join_date,
        monthly_fee = %monthly_fee,
        amount = %descriptor.amount,
        is_prorated = descriptor.is_prorated,
        next_due_date = %descriptor.next_due_date,
        "Calculated tenant billing"
    );

    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(date(2025, 1, 5)), 31);
        assert_eq!(days_in_month(date(2025, 4, 5)), 30);
        assert_eq!(days_in_month(date(2023, 2, 5)), 28);
        assert_eq!(days_in_month(date(2024, 2, 5)), 29);
        assert_eq!(days_in_month(date(1900, 2, 5)), 28);
        assert_eq!(days_in_month(date(2000, 2, 5)), 29);
    }

    #[test]
    fn test_remaining_days_counts_join_day() {
        assert_eq!(remaining_days_in_month(date(2025, 3, 10)), 22);
        assert_eq!(remaining_days_in_month(date(2025, 3, 31)), 1);
        assert_eq!(remaining_days_in_month(date(2025, 3, 1)), 31);
    }

    #[test]
    fn test_round_money_half_up() {
        assert_eq!(round_money(Decimal::new(12345, 3)), Decimal::new(1235, 2));
        assert_eq!(round_money(Decimal::new(12344, 3)), Decimal::new(1234, 2));
        assert_eq!(round_money(Decimal::new(10005, 4)), Decimal::new(100, 2));
    }

    #[test]
    fn test_calendar_date_rejects_impossible_days() {
        assert!(calendar_date(2025, 1, 32).is_err());
        assert!(calendar_date(2025, 2, 29).is_err());
        assert!(calendar_date(2025, 13, 1).is_err());
        assert_eq!(calendar_date(2024, 2, 29).unwrap(), date(2024, 2, 29));
    }

    #[test]
    fn test_negative_fee_rejected() {
        let result = calculate_prorated_amount(Decimal::new(-1, 2), date(2025, 3, 10));
        assert!(matches!(result, Err(BillingError::InvalidArgument(_))));

        let result = calculate_tenant_billing(Decimal::new(-100, 0), date(2025, 3, 1));
        assert!(matches!(result, Err(BillingError::InvalidArgument(_))));
    }

    #[test]
    fn test_zero_fee() {
        assert_eq!(
            calculate_prorated_amount(Decimal::ZERO, date(2025, 3, 10)).unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(date(2024, 2, 10)).unwrap(), date(2024, 2, 29));
        assert_eq!(last_day_of_month(date(2025, 12, 1)).unwrap(), date(2025, 12, 31));
    }

    #[test]
    fn test_arabic_description() {
        let label = localized_payment_period_description(
            date(2025, 3, 10),
            date(2025, 3, 31),
            true,
            Locale::Arabic,
        );
        assert_eq!(label, "مارس 10-31, 2025 (تناسبي)");
    }
}
