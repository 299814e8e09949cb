//! The products page: the store's stock list with search and status filters,
//! and the per-product stock adjustment controls.

use axum::{
    Extension,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    endpoints::{self, format_endpoint},
    gateway::{ApiClient, Product},
    html::{
        BADGE_BLOCKED_STYLE, BADGE_OK_STYLE, BADGE_WARN_STYLE, BUTTON_SECONDARY_STYLE,
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, link,
    },
    navigation::NavBar,
    pagination::{PaginationIndicator, create_pagination_indicators, paginate},
    products::{ProductsState, stock::stock_adjustment_forms},
    session::Session,
};

/// The query string of the products page.
///
/// The filter form never submits a page number, so changing the filters
/// always lands back on the first page.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProductListQuery {
    /// Case-insensitive substring to match against product names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// When true, show only blocked products.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked: Option<bool>,
    /// When true, show only products below their low-stock threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_stock: Option<bool>,
    /// Products per page, overriding the configured default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u64>,
    /// The page number, defaulting to the first page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
}

/// The page sizes offered by the filter form.
const PAGE_SIZE_OPTIONS: [u64; 3] = [8, 16, 32];

/// Apply the search and status filters, preserving the backend's order.
fn filter_products(mut products: Vec<Product>, query: &ProductListQuery) -> Vec<Product> {
    if let Some(search) = &query.search {
        let needle = search.trim().to_lowercase();

        if !needle.is_empty() {
            products.retain(|product| product.name.to_lowercase().contains(&needle));
        }
    }

    if query.blocked == Some(true) {
        products.retain(|product| product.blocked);
    }

    if query.low_stock == Some(true) {
        products.retain(|product| product.is_low_stock());
    }

    products
}

/// Display the store's products.
pub async fn get_products_page(
    State(state): State<ProductsState>,
    Extension(session): Extension<Session>,
    Query(query): Query<ProductListQuery>,
) -> Result<Response, Error> {
    let products = state.api.products(&session).await?.value;

    let filtered = filter_products(products, &query);
    let page_size = query
        .per_page
        .filter(|per_page| *per_page > 0)
        .unwrap_or(state.page_size);
    let page = paginate(filtered, query.page.unwrap_or(1), page_size);

    let nav_bar = NavBar::new(endpoints::PRODUCTS_VIEW);
    let content = html! {
        (nav_bar.into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full flex items-center justify-between mb-6"
            {
                h1 class="text-2xl font-bold" { "Products" }

                (link(endpoints::NEW_PRODUCT_VIEW, "New product"))
            }

            (filter_form(&query))

            @if page.items.is_empty() {
                p class="text-gray-600 dark:text-gray-400 py-8 text-center"
                {
                    "No products match the current filters."
                }
            } @else {
                div class="w-full overflow-x-auto shadow-md rounded"
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Product" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "In stock" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Adjust stock" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "" }
                            }
                        }

                        tbody
                        {
                            @for product in &page.items {
                                (product_row(product, &state.api))
                            }
                        }
                    }
                }

                (pagination_view(page.page, page.page_count, &query, state.max_pages))
            }
        }
    };

    Ok(base("Products", &content).into_response())
}

/// The search and status filters above the product table.
///
/// Changing any filter, including the page size, lands back on the first
/// page because the form never submits a page number.
fn filter_form(query: &ProductListQuery) -> Markup {
    html! {
        form method="get" action=(endpoints::PRODUCTS_VIEW) class="w-full flex flex-wrap items-end gap-4 mb-4"
        {
            div
            {
                label for="search" class=(FORM_LABEL_STYLE) { "Search" }

                input
                    type="text"
                    name="search"
                    id="search"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=(query.search.as_deref().unwrap_or(""));
            }

            label class="flex items-center gap-2 pb-2"
            {
                input
                    type="checkbox"
                    name="blocked"
                    value="true"
                    checked[query.blocked == Some(true)];
                "Blocked only"
            }

            label class="flex items-center gap-2 pb-2"
            {
                input
                    type="checkbox"
                    name="low_stock"
                    value="true"
                    checked[query.low_stock == Some(true)];
                "Low stock only"
            }

            div
            {
                label for="per_page" class=(FORM_LABEL_STYLE) { "Per page" }

                select name="per_page" id="per_page" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for option in PAGE_SIZE_OPTIONS {
                        option value=(option) selected[query.per_page == Some(option)] { (option) }
                    }
                }
            }

            button type="submit" class=(format!("{BUTTON_SECONDARY_STYLE} w-auto")) { "Apply" }
        }
    }
}

fn status_badge(product: &Product) -> Markup {
    let (style, label) = if product.blocked {
        (BADGE_BLOCKED_STYLE, "Blocked")
    } else if product.quantity < product.threshold_critical {
        (BADGE_BLOCKED_STYLE, "Critical")
    } else if product.is_low_stock() {
        (BADGE_WARN_STYLE, "Low stock")
    } else {
        (BADGE_OK_STYLE, "In stock")
    };

    html!( span class=(style) { (label) } )
}

/// One row of the product table, including its stock adjustment forms.
///
/// Stock endpoints re-render this row after an adjustment and swap it in
/// over HTMX, so its id must stay stable.
pub(super) fn product_row(product: &Product, api: &ApiClient) -> Markup {
    html! {
        tr id=(format!("product-row-{}", product.id)) class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex items-center gap-3"
                {
                    @if let Some(image) = &product.image {
                        img
                            src=(api.file_url(image))
                            alt=(product.name)
                            class="w-10 h-10 object-cover rounded";
                    }

                    (product.name)
                }
            }

            td class=(TABLE_CELL_STYLE) { (product.quantity) }
            td class=(TABLE_CELL_STYLE) { (status_badge(product)) }

            td class=(TABLE_CELL_STYLE)
            {
                @if product.blocked {
                    span class="text-sm text-gray-500" { "Adjustments disabled" }
                } @else {
                    (stock_adjustment_forms(product))
                }
            }

            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    a href=(format_endpoint(endpoints::EDIT_PRODUCT_VIEW, &product.id)) class=(LINK_STYLE)
                    {
                        "Edit"
                    }

                    a href=(format_endpoint(endpoints::PRODUCT_HISTORY_VIEW, &product.id)) class=(LINK_STYLE)
                    {
                        "History"
                    }
                }
            }
        }
    }
}

fn page_url(query: &ProductListQuery, page: u64) -> String {
    let target = ProductListQuery {
        page: Some(page),
        ..query.clone()
    };

    match serde_urlencoded::to_string(&target) {
        Ok(query_string) => format!("{}?{query_string}", endpoints::PRODUCTS_VIEW),
        Err(_) => endpoints::PRODUCTS_VIEW.to_owned(),
    }
}

fn pagination_view(
    current_page: u64,
    page_count: u64,
    query: &ProductListQuery,
    max_pages: u64,
) -> Markup {
    if page_count <= 1 {
        return html! {};
    }

    let indicators = create_pagination_indicators(current_page, page_count, max_pages);

    html! {
        nav class="flex gap-2 mt-4 text-sm" aria-label="Product pages"
        {
            @for indicator in indicators {
                @match indicator {
                    PaginationIndicator::CurrPage(page) => {
                        span class="font-bold px-2" aria-current="page" { (page) }
                    }
                    PaginationIndicator::Page(page) => {
                        a href=(page_url(query, page)) class=(format!("{LINK_STYLE} px-2")) { (page) }
                    }
                    PaginationIndicator::Ellipsis => {
                        span class="px-2" { "…" }
                    }
                    PaginationIndicator::BackButton(page) => {
                        a href=(page_url(query, page)) class=(LINK_STYLE) { "Previous" }
                    }
                    PaginationIndicator::NextButton(page) => {
                        a href=(page_url(query, page)) class=(LINK_STYLE) { "Next" }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod product_list_tests {
    use axum::{
        Json, Router,
        routing::{get, post},
    };
    use axum_test::{TestServer, TestServerConfig, Transport};
    use serde_json::{Value, json};

    use crate::{
        AppState, endpoints, pagination::PaginationConfig, routing::build_router,
    };

    use super::{ProductListQuery, filter_products};

    fn product(id: &str, name: &str, quantity: i64, blocked: bool) -> crate::gateway::Product {
        serde_json::from_value(json!({
            "_id": id,
            "name": name,
            "quantity": quantity,
            "thresholdLow": 10,
            "thresholdCritical": 3,
            "blocked": blocked,
        }))
        .unwrap()
    }

    #[test]
    fn search_is_a_case_insensitive_substring_match() {
        let products = vec![
            product("p1", "Cotton Saree", 20, false),
            product("p2", "Silk Saree", 20, false),
            product("p3", "Sandal", 20, false),
        ];
        let query = ProductListQuery {
            search: Some("saree".to_owned()),
            ..ProductListQuery::default()
        };

        let filtered = filter_products(products, &query);

        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|product| product.name.contains("Saree")));
    }

    #[test]
    fn blocked_filter_keeps_only_blocked_products() {
        let products = vec![
            product("p1", "Cotton Saree", 20, false),
            product("p2", "Silk Saree", 20, true),
        ];
        let query = ProductListQuery {
            blocked: Some(true),
            ..ProductListQuery::default()
        };

        let filtered = filter_products(products, &query);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "p2");
    }

    #[test]
    fn low_stock_filter_uses_the_product_threshold() {
        let products = vec![
            product("p1", "Cotton Saree", 20, false),
            product("p2", "Silk Saree", 4, false),
        ];
        let query = ProductListQuery {
            low_stock: Some(true),
            ..ProductListQuery::default()
        };

        let filtered = filter_products(products, &query);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "p2");
    }

    async fn stub_log_in() -> Json<Value> {
        Json(json!({"token": "token-1", "storeId": "store-1"}))
    }

    async fn stub_products() -> Json<Value> {
        // Product 5 sits below its low-stock threshold; product 9 is blocked.
        let products: Vec<Value> = (1..=9)
            .map(|i| {
                json!({
                    "_id": format!("p{i}"),
                    "name": format!("Product {i}"),
                    "quantity": if i == 5 { 8 } else { 20 },
                    "thresholdLow": 10,
                    "thresholdCritical": 3,
                    "blocked": i == 9,
                })
            })
            .collect();

        Json(json!(products))
    }

    fn spawn_backend() -> TestServer {
        let app = Router::new()
            .route("/auth/login", post(stub_log_in))
            .route("/products", get(stub_products));
        let config = TestServerConfig {
            transport: Some(Transport::HttpRandomPort),
            ..TestServerConfig::default()
        };

        TestServer::try_new_with_config(app, config).expect("Could not create stub backend.")
    }

    async fn logged_in_console(backend: &TestServer) -> TestServer {
        let state = AppState::new(
            backend.server_address().unwrap().as_str(),
            "foobar",
            Default::default(),
        );
        let mut server =
            TestServer::try_new(build_router(state)).expect("Could not create test server.");

        let form = [("name", "My Store"), ("password", "sesame")];
        let cookies = server.post(endpoints::LOG_IN_API).form(&form).await.cookies();
        server.add_cookies(cookies);

        server
    }

    #[tokio::test]
    async fn nine_products_fill_two_pages() {
        let backend = spawn_backend();
        let server = logged_in_console(&backend).await;

        let first_page = server.get(endpoints::PRODUCTS_VIEW).await;
        first_page.assert_status_ok();
        let text = first_page.text();
        assert!(text.contains("Product 1"));
        assert!(text.contains("Product 8"));
        assert!(!text.contains("Product 9"));

        let second_page = server
            .get(endpoints::PRODUCTS_VIEW)
            .add_query_param("page", "2")
            .await;
        second_page.assert_status_ok();
        let text = second_page.text();
        assert!(text.contains("Product 9"));
        assert!(!text.contains("Product 8"));
    }

    #[tokio::test]
    async fn per_page_overrides_the_default_page_size() {
        let backend = spawn_backend();
        let server = logged_in_console(&backend).await;

        let response = server
            .get(endpoints::PRODUCTS_VIEW)
            .add_query_param("per_page", "16")
            .await;

        response.assert_status_ok();
        let text = response.text();
        assert!(text.contains("Product 9"), "one page should now fit all nine");
    }

    #[tokio::test]
    async fn low_stock_products_show_the_warning_badge() {
        let backend = spawn_backend();
        let server = logged_in_console(&backend).await;

        let response = server.get(endpoints::PRODUCTS_VIEW).await;

        response.assert_status_ok();
        let document = scraper::Html::parse_document(&response.text());
        let low_row = scraper::Selector::parse("tr#product-row-p5").unwrap();
        let row_text: String = document
            .select(&low_row)
            .flat_map(|row| row.text())
            .collect();
        assert!(row_text.contains("Low stock"));

        let healthy_row = scraper::Selector::parse("tr#product-row-p1").unwrap();
        let row_text: String = document
            .select(&healthy_row)
            .flat_map(|row| row.text())
            .collect();
        assert!(row_text.contains("In stock"));
    }

    #[tokio::test]
    async fn configured_max_pages_limits_the_page_links() {
        let backend = spawn_backend();
        let state = AppState::new(
            backend.server_address().unwrap().as_str(),
            "foobar",
            PaginationConfig {
                product_page_size: 2,
                max_pages: 3,
                ..PaginationConfig::default()
            },
        );
        let mut server =
            TestServer::try_new(build_router(state)).expect("Could not create test server.");
        let form = [("name", "My Store"), ("password", "sesame")];
        let cookies = server.post(endpoints::LOG_IN_API).form(&form).await.cookies();
        server.add_cookies(cookies);

        // Nine products over five pages: only three numbered links fit, so
        // page four hides behind the ellipsis while the last page stays
        // reachable.
        let response = server.get(endpoints::PRODUCTS_VIEW).await;

        response.assert_status_ok();
        let document = scraper::Html::parse_document(&response.text());
        let last_page = scraper::Selector::parse("a[href=\"/products?page=5\"]").unwrap();
        assert!(document.select(&last_page).next().is_some());
        let fourth_page = scraper::Selector::parse("a[href=\"/products?page=4\"]").unwrap();
        assert!(document.select(&fourth_page).next().is_none());
        response.assert_text_contains("…");
    }

    #[tokio::test]
    async fn blocked_products_render_without_adjustment_forms() {
        let backend = spawn_backend();
        let server = logged_in_console(&backend).await;

        let response = server
            .get(endpoints::PRODUCTS_VIEW)
            .add_query_param("page", "2")
            .await;

        response.assert_status_ok();
        response.assert_text_contains("Adjustments disabled");
        let document = scraper::Html::parse_document(&response.text());
        let form_selector =
            scraper::Selector::parse("form[hx-post=\"/api/products/p9/stock/add\"]").unwrap();
        assert!(document.select(&form_selector).next().is_none());
    }

    #[tokio::test]
    async fn unblocked_products_render_adjustment_forms() {
        let backend = spawn_backend();
        let server = logged_in_console(&backend).await;

        let response = server.get(endpoints::PRODUCTS_VIEW).await;

        response.assert_status_ok();
        let document = scraper::Html::parse_document(&response.text());
        let add_selector =
            scraper::Selector::parse("form[hx-post=\"/api/products/p1/stock/add\"]").unwrap();
        let remove_selector =
            scraper::Selector::parse("form[hx-post=\"/api/products/p1/stock/remove\"]").unwrap();
        assert!(document.select(&add_selector).next().is_some());
        assert!(document.select(&remove_selector).next().is_some());
    }
}
