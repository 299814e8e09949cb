//! The route URIs for the console.
//!
//! For routes that take a parameter, e.g., '/customers/{customer_id}/entries',
//! use [format_endpoint].

/// The root route, which serves the store log-in page.
pub const ROOT: &str = "/";
/// The page for creating a new store account.
pub const REGISTER_VIEW: &str = "/register";
/// The landing page for logged in stores.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page listing the store's customers.
pub const CUSTOMERS_VIEW: &str = "/customers";
/// The ledger page for a single customer.
pub const CUSTOMER_ENTRIES_VIEW: &str = "/customers/{customer_id}/entries";
/// The page listing the store's products.
pub const PRODUCTS_VIEW: &str = "/products";
/// The page for creating a new product.
pub const NEW_PRODUCT_VIEW: &str = "/products/new";
/// The page for editing an existing product.
pub const EDIT_PRODUCT_VIEW: &str = "/products/{product_id}/edit";
/// The stock history page for a single product.
pub const PRODUCT_HISTORY_VIEW: &str = "/products/{product_id}/history";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a store.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for creating a store account.
pub const REGISTER_API: &str = "/api/register";
/// The route for clearing the session and logging out.
pub const LOG_OUT: &str = "/api/log_out";
/// The route for creating a customer.
pub const CUSTOMERS_API: &str = "/api/customers";
/// The route for verifying a customer's credential.
pub const VERIFY_CUSTOMER_API: &str = "/api/customers/{customer_id}/verify";
/// The route for appending a ledger entry to a customer.
pub const ENTRIES_API: &str = "/api/customers/{customer_id}/entries";
/// The route for creating a product.
pub const PRODUCTS_API: &str = "/api/products";
/// The route for updating a product (fields, blocked flag or delete).
pub const UPDATE_PRODUCT_API: &str = "/api/products/{product_id}";
/// The route for adding stock to a product.
pub const ADD_STOCK_API: &str = "/api/products/{product_id}/stock/add";
/// The route for removing stock from a product.
pub const REMOVE_STOCK_API: &str = "/api/products/{product_id}/stock/remove";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace. For
/// example, in '/customers/{customer_id}/entries', '{customer_id}' is the
/// parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter. If no parameter is found, the original
/// `endpoint_path` is returned unchanged.
pub fn format_endpoint(endpoint_path: &str, id: &str) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know the paths will parse as URIs when
// registered with the router or used in redirects.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::REGISTER_VIEW);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::CUSTOMERS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::CUSTOMER_ENTRIES_VIEW);
        assert_endpoint_is_valid_uri(endpoints::PRODUCTS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::NEW_PRODUCT_VIEW);
        assert_endpoint_is_valid_uri(endpoints::EDIT_PRODUCT_VIEW);
        assert_endpoint_is_valid_uri(endpoints::PRODUCT_HISTORY_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);

        assert_endpoint_is_valid_uri(endpoints::LOG_IN_API);
        assert_endpoint_is_valid_uri(endpoints::REGISTER_API);
        assert_endpoint_is_valid_uri(endpoints::LOG_OUT);
        assert_endpoint_is_valid_uri(endpoints::CUSTOMERS_API);
        assert_endpoint_is_valid_uri(endpoints::VERIFY_CUSTOMER_API);
        assert_endpoint_is_valid_uri(endpoints::ENTRIES_API);
        assert_endpoint_is_valid_uri(endpoints::PRODUCTS_API);
        assert_endpoint_is_valid_uri(endpoints::UPDATE_PRODUCT_API);
        assert_endpoint_is_valid_uri(endpoints::ADD_STOCK_API);
        assert_endpoint_is_valid_uri(endpoints::REMOVE_STOCK_API);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", "64f1");

        assert_eq!(formatted_path, "/hello/64f1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", "64f1");

        assert_eq!(formatted_path, "/hello/world");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/customers/{customer_id}/entries", "64f1");

        assert_eq!(formatted_path, "/customers/64f1/entries");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
