//! Invoice numbers of the form `INV-{YYYY}{MM}-{TENANT8}-{NNNN}`.
//!
//! `YYYY`/`MM` come from the invoice date, `TENANT8` is the tenant id
//! upper-cased and cut to eight characters, and `NNNN` is a four-digit
//! suffix seeded from the last four digits of the wall clock in
//! milliseconds.

use chrono::{Datelike, Months, NaiveDate, Utc};
use dashmap::DashMap;
use std::collections::HashSet;
use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::BillingError;

/// Number of distinct four-digit suffixes.
const SUFFIX_SPACE: u16 = 10_000;

const TENANT_PREFIX_LEN: usize = 8;

/// Prefixes tracked by a generator unless configured otherwise.
pub const DEFAULT_MAX_PREFIXES: usize = 10_000;

/// Components of a parsed invoice number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceNumberParts {
    pub year: i32,
    pub month: u32,
    pub tenant_prefix: String,
    pub suffix: u16,
}

impl InvoiceNumberParts {
    /// `INV-{YYYY}{MM}-{TENANT8}`, shared by every invoice of a tenant in a month.
    pub fn prefix(&self) -> String {
        self.key().to_string()
    }

    fn key(&self) -> PrefixKey {
        PrefixKey {
            year: self.year,
            month: self.month,
            tenant: self.tenant_prefix.clone(),
        }
    }
}

/// `INV-{YYYY}{MM}-{TENANT8}` as a map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PrefixKey {
    year: i32,
    month: u32,
    tenant: String,
}

impl PrefixKey {
    fn new(tenant_id: &str, date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            tenant: tenant_prefix(tenant_id),
        }
    }

    fn month_index(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }
}

impl fmt::Display for PrefixKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "INV-{:04}{:02}-{}", self.year, self.month, self.tenant)
    }
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

/// Upper-case first, then cut: case mapping can lengthen a string
/// (`ß` becomes `SS`).
fn tenant_prefix(tenant_id: &str) -> String {
    tenant_id
        .to_uppercase()
        .chars()
        .take(TENANT_PREFIX_LEN)
        .collect()
}

/// Last four digits of the current Unix time in milliseconds.
pub fn timestamp_suffix() -> u16 {
    (Utc::now().timestamp_millis().rem_euclid(i64::from(SUFFIX_SPACE))) as u16
}

/// Render an invoice number with an explicit suffix (taken modulo 10000).
pub fn format_invoice_number(tenant_id: &str, date: NaiveDate, suffix: u16) -> String {
    format!(
        "{}-{:04}",
        PrefixKey::new(tenant_id, date),
        suffix % SUFFIX_SPACE
    )
}

/// Invoice number with a timestamp suffix.
///
/// Calls for the same tenant and month collide whenever their millisecond
/// timestamps share the last four digits; use [`InvoiceNumberGenerator`]
/// where uniqueness matters.
pub fn generate_invoice_number(tenant_id: &str, date: NaiveDate) -> String {
    format_invoice_number(tenant_id, date, timestamp_suffix())
}

/// Split an invoice number into its parts.
///
/// The tenant part is upper-cased, so `INV-202503-acme-0100` and
/// `INV-202503-ACME-0100` are the same invoice number.
pub fn parse_invoice_number(invoice_number: &str) -> Result<InvoiceNumberParts, BillingError> {
    let malformed = || BillingError::invalid(format!("Malformed invoice number: {}", invoice_number));

    let rest = invoice_number.strip_prefix("INV-").ok_or_else(malformed)?;
    let (period, rest) = rest.split_once('-').ok_or_else(malformed)?;
    let (tenant, suffix) = rest.rsplit_once('-').ok_or_else(malformed)?;

    if period.len() != 6 || !period.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    if suffix.len() != 4 || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let tenant_prefix = tenant.to_uppercase();
    if tenant_prefix.chars().count() > TENANT_PREFIX_LEN {
        return Err(malformed());
    }

    let year: i32 = period[..4].parse().map_err(|_| malformed())?;
    let month: u32 = period[4..].parse().map_err(|_| malformed())?;
    if !(1..=12).contains(&month) {
        return Err(malformed());
    }
    let suffix: u16 = suffix.parse().map_err(|_| malformed())?;

    Ok(InvoiceNumberParts {
        year,
        month,
        tenant_prefix,
        suffix,
    })
}

/// Issues invoice numbers that are unique per `INV-{YYYY}{MM}-{TENANT8}`
/// prefix while that prefix is tracked.
///
/// The suffix starts at the timestamp tail and probes forward (wrapping at
/// 10000) past suffixes already issued or registered.
///
/// Memory is bounded two ways. [`next`](Self::next) drops prefixes older
/// than the previous calendar month once per month, and no more than
/// `max_prefixes` prefixes are tracked at a time.
#[derive(Debug)]
pub struct InvoiceNumberGenerator {
    issued: DashMap<PrefixKey, HashSet<u16>>,
    max_prefixes: usize,
    /// Month index below which prefixes have been pruned. Issuing holds the
    /// read side so a prune never races an insert.
    retained_from: RwLock<i64>,
}

impl Default for InvoiceNumberGenerator {
    fn default() -> Self {
        Self::with_max_prefixes(DEFAULT_MAX_PREFIXES)
    }
}

impl InvoiceNumberGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_prefixes(max_prefixes: usize) -> Self {
        Self {
            issued: DashMap::new(),
            max_prefixes: max_prefixes.max(1),
            retained_from: RwLock::new(i64::MIN),
        }
    }

    pub fn max_prefixes(&self) -> usize {
        self.max_prefixes
    }

    fn read_window(&self) -> RwLockReadGuard<'_, i64> {
        self.retained_from
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_window(&self) -> RwLockWriteGuard<'_, i64> {
        self.retained_from
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Issue a number with a timestamp seed, pruning months before the
    /// previous one first.
    pub fn next(&self, tenant_id: &str, date: NaiveDate) -> Result<String, BillingError> {
        self.roll_window(Utc::now().date_naive());
        self.next_with_seed(tenant_id, date, timestamp_suffix())
    }

    pub fn next_with_seed(
        &self,
        tenant_id: &str,
        date: NaiveDate,
        seed: u16,
    ) -> Result<String, BillingError> {
        let key = PrefixKey::new(tenant_id, date);
        let _window = self.read_window();

        if !self.issued.contains_key(&key) && self.issued.len() >= self.max_prefixes {
            tracing::warn!(
                prefix = %key,
                limit = self.max_prefixes,
                "Invoice prefix limit reached"
            );
            return Err(BillingError::InvoicePrefixLimit {
                limit: self.max_prefixes,
            });
        }

        let mut issued = self.issued.entry(key.clone()).or_default();

        for offset in 0..SUFFIX_SPACE {
            let candidate = ((u32::from(seed) + u32::from(offset)) % u32::from(SUFFIX_SPACE)) as u16;
            if issued.insert(candidate) {
                if offset > 0 {
                    tracing::debug!(
                        prefix = %key,
                        seed = seed,
                        suffix = candidate,
                        "Invoice suffix collision resolved"
                    );
                }
                return Ok(format!("{}-{:04}", key, candidate));
            }
        }

        tracing::warn!(prefix = %key, "Invoice number space exhausted");
        Err(BillingError::InvoiceNumbersExhausted {
            prefix: key.to_string(),
        })
    }

    /// Mark a number that already exists elsewhere (e.g. in storage) as taken.
    /// Returns `false` if it was already known.
    ///
    /// Registration is not subject to the prefix limit.
    pub fn register_issued(&self, invoice_number: &str) -> Result<bool, BillingError> {
        let parts = parse_invoice_number(invoice_number)?;
        let _window = self.read_window();
        Ok(self
            .issued
            .entry(parts.key())
            .or_default()
            .insert(parts.suffix))
    }

    /// Forget every prefix for a month before `date`'s month. Returns the
    /// number of prefixes dropped.
    pub fn prune_before(&self, date: NaiveDate) -> usize {
        let mut retained_from = self.write_window();
        self.remove_before(&mut retained_from, date)
    }

    /// Keep `today`'s month and the one before it.
    fn roll_window(&self, today: NaiveDate) {
        let Some(cutoff) = today
            .with_day(1)
            .and_then(|first| first.checked_sub_months(Months::new(1)))
        else {
            return;
        };

        if *self.read_window() >= month_index(cutoff) {
            return;
        }
        let mut retained_from = self.write_window();
        // Another caller may have rolled the window while we waited.
        if *retained_from >= month_index(cutoff) {
            return;
        }
        self.remove_before(&mut retained_from, cutoff);
    }

    fn remove_before(&self, retained_from: &mut i64, date: NaiveDate) -> usize {
        let cutoff = month_index(date);

        let before = self.issued.len();
        self.issued.retain(|key, _| key.month_index() >= cutoff);
        let removed = before.saturating_sub(self.issued.len());
        *retained_from = (*retained_from).max(cutoff);

        if removed > 0 {
            tracing::info!(
                retained_from = %date.format("%Y-%m"),
                removed = removed,
                "Pruned stale invoice prefixes"
            );
        }
        removed
    }

    /// Count of numbers issued or registered under the prefix for
    /// `tenant_id` in `date`'s month.
    pub fn issued_count(&self, tenant_id: &str, date: NaiveDate) -> usize {
        self.issued
            .get(&PrefixKey::new(tenant_id, date))
            .map(|set| set.len())
            .unwrap_or(0)
    }

    /// Number of `INV-{YYYY}{MM}-{TENANT8}` prefixes currently tracked.
    pub fn tracked_prefixes(&self) -> usize {
        self.issued.len()
    }
}
