//! A customer's ledger: the entries page with its filters and totals, the
//! password verification step, and the endpoint that appends entries.

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::{AppState, gateway::ApiClient};

mod add_endpoint;
mod page;
mod verify_endpoint;

pub use add_endpoint::post_add_entry;
pub use page::get_customer_entries_page;
pub use verify_endpoint::post_verify_customer;

/// The state needed by the ledger pages and endpoints.
///
/// Carries the cookie key because verification issues an entry grant cookie
/// and the add-entry endpoint checks it.
#[derive(Clone)]
pub struct EntriesState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The client for the backend API that owns the ledger data.
    pub api: ApiClient,
    /// The number of entries to show per ledger page.
    pub page_size: u64,
    /// The maximum number of page links to show under the ledger table.
    pub max_pages: u64,
}

impl FromRef<AppState> for EntriesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            api: state.api.clone(),
            page_size: state.pagination_config.ledger_page_size,
            max_pages: state.pagination_config.max_pages,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<EntriesState> for Key {
    fn from_ref(state: &EntriesState) -> Self {
        state.cookie_key.clone()
    }
}
