//! The ledger view model.
//!
//! A customer's ledger arrives from the backend as an unordered list of
//! entries. This module turns it into what the entries page shows: a
//! filtered, newest-first, paged slice plus running totals. The totals are
//! always computed over the complete ledger, so narrowing the view never
//! changes the customer's balance.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    gateway::{Entry, EntryKind},
    pagination::{Page, paginate},
};

/// Which entry kinds the ledger view includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    #[default]
    All,
    Income,
    Expense,
}

impl KindFilter {
    fn matches(&self, kind: EntryKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Income => kind == EntryKind::Income,
            KindFilter::Expense => kind == EntryKind::Expense,
        }
    }

    /// The value used in the filter form's select options.
    pub fn as_str(&self) -> &'static str {
        match self {
            KindFilter::All => "all",
            KindFilter::Income => "income",
            KindFilter::Expense => "expense",
        }
    }
}

/// The filters applied to a ledger view. Both date bounds are inclusive
/// calendar days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerQuery {
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,
    pub kind: KindFilter,
    pub page: u64,
}

/// The income, expense and net totals over a complete ledger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerTotals {
    pub income: f64,
    pub expense: f64,
    /// Income minus expense. Negative when the customer owes the store.
    pub net: f64,
}

/// Everything the entries page needs to render a ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerView {
    /// The current page of filtered entries, newest first.
    pub page: Page<Entry>,
    /// The number of entries that matched the filters, across all pages.
    pub matching_count: usize,
    /// Totals over the unfiltered ledger.
    pub totals: LedgerTotals,
}

fn within_bounds(entry: &Entry, date_from: Option<Date>, date_to: Option<Date>) -> bool {
    if let Some(from) = date_from
        && entry.occurred_at < from.midnight().assume_utc()
    {
        return false;
    }

    // The upper bound covers the whole of its calendar day, so compare
    // against midnight of the following day.
    if let Some(to) = date_to {
        match to.next_day() {
            Some(next) if entry.occurred_at >= next.midnight().assume_utc() => return false,
            _ => {}
        }
    }

    true
}

/// Sum a ledger's entries by kind, over the entire ledger.
pub fn ledger_totals(entries: &[Entry]) -> LedgerTotals {
    let mut income = 0.0;
    let mut expense = 0.0;

    for entry in entries {
        match entry.kind {
            EntryKind::Income => income += entry.amount,
            EntryKind::Expense => expense += entry.amount,
        }
    }

    LedgerTotals {
        income,
        expense,
        net: income - expense,
    }
}

/// Build the ledger view for one page of a customer's entries.
///
/// Filtering and pagination narrow what is displayed; the totals are taken
/// over `entries` before any filter is applied. Entries sharing a timestamp
/// keep their relative order from the backend.
pub fn build_ledger_view(entries: Vec<Entry>, query: &LedgerQuery, page_size: u64) -> LedgerView {
    let totals = ledger_totals(&entries);

    let mut matching: Vec<Entry> = entries
        .into_iter()
        .filter(|entry| {
            query.kind.matches(entry.kind)
                && within_bounds(entry, query.date_from, query.date_to)
        })
        .collect();
    matching.sort_by_key(|entry| std::cmp::Reverse(entry.occurred_at));

    let matching_count = matching.len();
    let page = paginate(matching, query.page, page_size);

    LedgerView {
        page,
        matching_count,
        totals,
    }
}

/// Format an entry timestamp the way ledger rows display it.
pub fn format_entry_date(occurred_at: OffsetDateTime) -> String {
    format!(
        "{:02}/{:02}/{}",
        occurred_at.day(),
        occurred_at.month() as u8,
        occurred_at.year()
    )
}
