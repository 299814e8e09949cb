//! The customer roster: the page listing a store's customers and the
//! endpoint for adding new ones.

use axum::extract::FromRef;

use crate::{AppState, gateway::ApiClient};

mod create_endpoint;
mod page;

pub use create_endpoint::post_create_customer;
pub use page::get_customers_page;

/// The state needed by the customer pages and endpoints.
#[derive(Clone)]
pub struct CustomersState {
    /// The client for the backend API that owns the customer data.
    pub api: ApiClient,
}

impl FromRef<AppState> for CustomersState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
        }
    }
}
