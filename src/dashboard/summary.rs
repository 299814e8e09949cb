//! Aggregation of the store-wide totals shown at the top of the dashboard.

use crate::gateway::{Customer, EntryKind};

/// The store-wide totals across every customer ledger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct StoreSummary {
    /// How many customers the store has.
    pub customer_count: usize,
    /// Income received across all ledgers.
    pub income: f64,
    /// Expenses recorded across all ledgers.
    pub expense: f64,
    /// Income minus expense.
    pub net: f64,
}

/// Total up every ledger entry of every customer.
///
/// Every customer counts, regardless of status: a blocked customer's history
/// is still part of the store's books.
pub(super) fn summarize(customers: &[Customer]) -> StoreSummary {
    let mut income = 0.0;
    let mut expense = 0.0;

    for customer in customers {
        for entry in &customer.entries {
            match entry.kind {
                EntryKind::Income => income += entry.amount,
                EntryKind::Expense => expense += entry.amount,
            }
        }
    }

    StoreSummary {
        customer_count: customers.len(),
        income,
        expense,
        net: income - expense,
    }
}
