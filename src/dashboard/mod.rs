//! Dashboard module
//!
//! Provides an overview page showing store-wide ledger totals and a
//! searchable customer list.

mod cards;
mod customers;
mod handlers;
mod summary;
mod tables;

pub use customers::{CustomerSort, filter_and_sort_customers, total_spent};
pub use handlers::get_dashboard_page;
