//! Filtering and ordering of the dashboard's customer list.

use serde::Deserialize;

use crate::gateway::{Customer, EntryKind};

/// The column the customer list is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerSort {
    /// Alphabetical by name, ignoring case.
    #[default]
    Name,
    /// Fewest orders first. Customers without an order count sort first.
    Orders,
    /// Lowest lifetime spend first.
    Spent,
}

impl CustomerSort {
    /// The value used in the sort select's options.
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerSort::Name => "name",
            CustomerSort::Orders => "orders",
            CustomerSort::Spent => "spent",
        }
    }
}

/// The total a customer has spent: the sum of their expense entries.
///
/// Income entries are repayments, not purchases, so they do not count
/// towards spend.
pub fn total_spent(customer: &Customer) -> f64 {
    customer
        .entries
        .iter()
        .filter(|entry| entry.kind == EntryKind::Expense)
        .map(|entry| entry.amount)
        .sum()
}

fn matches_search(customer: &Customer, needle_lower: &str) -> bool {
    if needle_lower.is_empty() {
        return true;
    }

    if customer.name.to_lowercase().contains(needle_lower) {
        return true;
    }

    customer
        .contact
        .as_deref()
        .is_some_and(|contact| contact.to_lowercase().contains(needle_lower))
}

/// Narrow and order the customer list for display.
///
/// `search` matches as a case-insensitive substring of the name or contact.
/// Sorting is stable, so customers that compare equal keep the backend's
/// order. Name order compares lowercase-folded strings by code point, not
/// with locale collation, so accented names sort after unaccented ones.
pub fn filter_and_sort_customers(
    mut customers: Vec<Customer>,
    search: &str,
    sort: CustomerSort,
) -> Vec<Customer> {
    let needle_lower = search.trim().to_lowercase();
    customers.retain(|customer| matches_search(customer, &needle_lower));

    match sort {
        CustomerSort::Name => {
            customers.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        }
        CustomerSort::Orders => {
            customers.sort_by_key(|customer| customer.orders.unwrap_or_default())
        }
        CustomerSort::Spent => customers.sort_by(|a, b| {
            total_spent(a)
                .partial_cmp(&total_spent(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
    }

    customers
}
