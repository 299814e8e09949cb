//! Defines the axum router and maps routes to handlers.

use axum::{
    Router,
    extract::FromRef,
    middleware,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    customers::{get_customers_page, post_create_customer},
    dashboard::get_dashboard_page,
    endpoints,
    entries::{get_customer_entries_page, post_add_entry, post_verify_customer},
    internal_server_error::get_internal_server_error_page,
    log_in::{get_log_in_page, post_log_in},
    log_out::get_log_out,
    not_found::get_404_not_found,
    products::{
        get_edit_product_page, get_new_product_page, get_product_history_page, get_products_page,
        post_add_stock, post_create_product, post_remove_stock, post_update_product,
    },
    register_store::{get_register_page, post_register_store},
    session::{SessionState, session_guard, session_guard_hx},
};

/// Return a router with all the app's routes.
///
/// Page routes go through [session_guard], which answers a missing session
/// with a plain redirect to the log-in page. API routes taken over HTMX go
/// through [session_guard_hx] instead, which answers with an `HX-Redirect`
/// header so the whole page navigates rather than swapping a fragment.
pub fn build_router(state: AppState) -> Router {
    let session_state = SessionState::from_ref(&state);

    let protected_views = Router::new()
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::CUSTOMERS_VIEW, get(get_customers_page))
        .route(
            endpoints::CUSTOMER_ENTRIES_VIEW,
            get(get_customer_entries_page),
        )
        .route(endpoints::PRODUCTS_VIEW, get(get_products_page))
        .route(endpoints::NEW_PRODUCT_VIEW, get(get_new_product_page))
        .route(endpoints::EDIT_PRODUCT_VIEW, get(get_edit_product_page))
        .route(
            endpoints::PRODUCT_HISTORY_VIEW,
            get(get_product_history_page),
        )
        .route_layer(middleware::from_fn_with_state(
            session_state.clone(),
            session_guard,
        ));

    let protected_api = Router::new()
        .route(endpoints::CUSTOMERS_API, post(post_create_customer))
        .route(endpoints::VERIFY_CUSTOMER_API, post(post_verify_customer))
        .route(endpoints::ENTRIES_API, post(post_add_entry))
        .route(endpoints::PRODUCTS_API, post(post_create_product))
        .route(endpoints::UPDATE_PRODUCT_API, post(post_update_product))
        .route(endpoints::ADD_STOCK_API, post(post_add_stock))
        .route(endpoints::REMOVE_STOCK_API, post(post_remove_stock))
        .route_layer(middleware::from_fn_with_state(
            session_state,
            session_guard_hx,
        ));

    Router::new()
        .route(endpoints::ROOT, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::REGISTER_API, post(post_register_store))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .merge(protected_views)
        .merge(protected_api)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

#[cfg(test)]
mod routing_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;

    use crate::{AppState, endpoints};

    use super::build_router;

    fn test_server() -> TestServer {
        let state = AppState::new("http://localhost:1", "foobar", Default::default());

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn protected_views_redirect_to_log_in_without_a_session() {
        let server = test_server();
        let protected = [
            endpoints::DASHBOARD_VIEW,
            endpoints::CUSTOMERS_VIEW,
            "/customers/c1/entries",
            endpoints::PRODUCTS_VIEW,
            endpoints::NEW_PRODUCT_VIEW,
            "/products/p1/edit",
            "/products/p1/history",
        ];

        for route in protected {
            let response = server.get(route).await;

            response.assert_status_see_other();
            assert_eq!(
                response.header("location"),
                endpoints::ROOT,
                "{route} should redirect to the log-in page"
            );
        }
    }

    #[tokio::test]
    async fn protected_api_routes_answer_with_hx_redirect() {
        let server = test_server();
        let protected = [
            endpoints::CUSTOMERS_API,
            "/api/customers/c1/verify",
            "/api/customers/c1/entries",
            endpoints::PRODUCTS_API,
            "/api/products/p1",
            "/api/products/p1/stock/add",
            "/api/products/p1/stock/remove",
        ];

        for route in protected {
            let response = server.post(route).add_header("HX-Request", "true").await;

            response.assert_status_ok();
            assert_eq!(
                response.header("hx-redirect"),
                endpoints::ROOT,
                "{route} should answer with an HTMX redirect"
            );
        }
    }

    #[tokio::test]
    async fn log_in_page_is_reachable_without_a_session() {
        let server = test_server();

        let response = server.get(endpoints::ROOT).await;

        response.assert_status_ok();
    }

    #[tokio::test]
    async fn register_page_is_reachable_without_a_session() {
        let server = test_server();

        let response = server.get(endpoints::REGISTER_VIEW).await;

        response.assert_status_ok();
    }

    #[tokio::test]
    async fn unknown_routes_fall_back_to_not_found() {
        let server = test_server();

        let response = server.get("/no/such/page").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}
