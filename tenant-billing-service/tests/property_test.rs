//! Property-based tests for the billing calculator.
//!
//! Fees are generated in whole cents, the precision amounts are quoted in.

use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use tenant_billing_service::services::calculator::{
    calculate_next_payment_date, calculate_prorated_amount, calculate_tenant_billing,
    days_in_month, needs_prorated_payment, round_money,
};

fn any_date() -> impl Strategy<Value = NaiveDate> {
    (1970i32..2200, 1u32..=12, 1u32..=31).prop_map(|(year, month, day)| {
        let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
        first.with_day(day.min(days_in_month(first))).unwrap()
    })
}

fn any_fee() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    /// Proration never charges more than the monthly fee.
    #[test]
    fn prorated_amount_never_exceeds_fee(fee in any_fee(), join_date in any_date()) {
        let amount = calculate_prorated_amount(fee, join_date).unwrap();
        prop_assert!(amount >= Decimal::ZERO);
        prop_assert!(amount <= fee, "{} > {} on {}", amount, fee, join_date);
    }

    /// Joining on the 1st costs exactly the monthly fee.
    #[test]
    fn join_on_first_costs_full_fee(fee in any_fee(), date in any_date()) {
        let first = date.with_day(1).unwrap();
        prop_assert_eq!(calculate_prorated_amount(fee, first).unwrap(), round_money(fee));

        let billing = calculate_tenant_billing(fee, first).unwrap();
        prop_assert!(!billing.is_prorated);
        prop_assert_eq!(billing.amount, fee);
    }

    /// Only the 1st of the month escapes proration.
    #[test]
    fn proration_flag_iff_not_first(date in any_date()) {
        prop_assert_eq!(needs_prorated_payment(date), date.day() != 1);
    }

    /// First payments are followed by the 1st of the next month.
    #[test]
    fn first_payment_next_date_is_first_of_next_month(date in any_date()) {
        let next = calculate_next_payment_date(date, true).unwrap();
        prop_assert_eq!(next.day(), 1);
        if date.month() == 12 {
            prop_assert_eq!(next.month(), 1);
            prop_assert_eq!(next.year(), date.year() + 1);
        } else {
            prop_assert_eq!(next.month(), date.month() + 1);
            prop_assert_eq!(next.year(), date.year());
        }
    }

    /// Renewals keep the day of month unless the next month is shorter.
    #[test]
    fn renewal_is_clamped_to_next_month(date in any_date()) {
        let next = calculate_next_payment_date(date, false).unwrap();
        let next_month_len = days_in_month(next);
        prop_assert_eq!(next.day(), date.day().min(next_month_len));
        prop_assert!(next > date);
    }

    /// Quoted amounts are always whole cents.
    #[test]
    fn quoted_amount_is_whole_cents(fee in any_fee(), join_date in any_date()) {
        let billing = calculate_tenant_billing(fee, join_date).unwrap();
        prop_assert_eq!(billing.amount, round_money(billing.amount));
        prop_assert_eq!(billing.next_payment_amount, fee);
    }
}
