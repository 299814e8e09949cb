//! Product stock: the list page with its filters, product creation and
//! editing, stock adjustments, and the stock history page.

use axum::extract::FromRef;

use crate::{AppState, gateway::ApiClient};

mod create;
mod edit;
mod history;
mod list;
mod stock;

pub use create::{get_new_product_page, post_create_product};
pub use edit::{get_edit_product_page, post_update_product};
pub use history::get_product_history_page;
pub use list::get_products_page;
pub use stock::{post_add_stock, post_remove_stock};

/// The state needed by the product pages and endpoints.
#[derive(Clone)]
pub struct ProductsState {
    /// The client for the backend API that owns the product data.
    pub api: ApiClient,
    /// The number of products to show per page.
    pub page_size: u64,
    /// The maximum number of page links to show under the product table.
    pub max_pages: u64,
}

impl FromRef<AppState> for ProductsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            page_size: state.pagination_config.product_page_size,
            max_pages: state.pagination_config.max_pages,
        }
    }
}
