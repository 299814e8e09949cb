//! Dashboard HTTP handlers and view rendering.
//!
//! The dashboard gives a store-wide overview: totals across every customer
//! ledger, plus a searchable, sortable customer list.

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    dashboard::{
        cards::summary_cards_view,
        customers::{CustomerSort, filter_and_sort_customers},
        summary::summarize,
        tables::customer_table_view,
    },
    endpoints,
    gateway::ApiClient,
    html::{BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    session::Session,
};

/// The state needed for displaying the dashboard page.
#[derive(Clone)]
pub struct DashboardState {
    /// The client for the backend API that owns the customer data.
    pub api: ApiClient,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
        }
    }
}

/// The filters accepted by the dashboard page's query string.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Case-insensitive substring to match against names and contacts.
    #[serde(default)]
    pub search: Option<String>,
    /// The column to order the customer list by.
    #[serde(default)]
    pub sort: Option<CustomerSort>,
}

/// Display a page with an overview of the store's data.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(session): Extension<Session>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let customers = state.api.customers(&session).await?.value;

    let summary = summarize(&customers);
    let search = query.search.unwrap_or_default();
    let sort = query.sort.unwrap_or_default();
    let customers = filter_and_sort_customers(customers, &search, sort);

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);
    let content = html! {
        (nav_bar.into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-6" { "Dashboard" }

            (summary_cards_view(&summary))

            (filter_form(&search, sort))

            (customer_table_view(&customers))
        }
    };

    Ok(base("Dashboard", &content).into_response())
}

/// The search and sort controls above the customer table.
///
/// Submitting the form never carries a page number, so changing the filters
/// always lands on the first page of results.
fn filter_form(search: &str, sort: CustomerSort) -> Markup {
    let sort_options = [
        (CustomerSort::Name, "Name"),
        (CustomerSort::Orders, "Orders"),
        (CustomerSort::Spent, "Total spent"),
    ];

    html! {
        form
            method="get"
            action=(endpoints::DASHBOARD_VIEW)
            class="w-full flex flex-wrap items-end gap-4 mb-4"
        {
            div class="grow"
            {
                label for="search" class=(FORM_LABEL_STYLE) { "Search" }

                input
                    type="search"
                    name="search"
                    id="search"
                    placeholder="Name or contact"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=(search);
            }

            div
            {
                label for="sort" class=(FORM_LABEL_STYLE) { "Sort by" }

                select name="sort" id="sort" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for (option, label) in sort_options {
                        option value=(option.as_str()) selected[option == sort] { (label) }
                    }
                }
            }

            button type="submit" class=(format!("{BUTTON_SECONDARY_STYLE} w-auto")) { "Apply" }
        }
    }
}

#[cfg(test)]
mod dashboard_page_tests {
    use axum::{
        Json, Router,
        extract::Query,
        routing::{get, post},
    };
    use axum_test::{TestServer, TestServerConfig, Transport};
    use serde_json::json;

    use crate::{AppState, endpoints, routing::build_router};

    async fn stub_customers() -> Json<serde_json::Value> {
        Json(json!([
            {
                "_id": "c1",
                "name": "Zoe",
                "contact": "021-555-0001",
                "orders": 2,
                "entries": [
                    {"amount": 100.0, "type": "income", "date": "2024-03-01T09:00:00Z"},
                    {"amount": 40.0, "type": "expense", "date": "2024-03-02T09:00:00Z"}
                ]
            },
            {
                "_id": "c2",
                "name": "anaru",
                "orders": 7,
                "entries": [
                    {"amount": 60.0, "type": "income", "date": "2024-03-03T09:00:00Z"}
                ]
            }
        ]))
    }

    async fn stub_log_in() -> Json<serde_json::Value> {
        Json(json!({"token": "token-1", "storeId": "store-1"}))
    }

    fn spawn_backend() -> TestServer {
        let app = Router::new()
            .route("/auth/login", post(stub_log_in))
            .route("/users", get(stub_customers));
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
    async fn dashboard_shows_totals_over_every_customer() {
        let backend = spawn_backend();
        let server = logged_in_console(&backend).await;

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status_ok();
        response.assert_text_contains("₹160.00");
        response.assert_text_contains("₹40.00");
        response.assert_text_contains("₹120.00");
    }

    #[tokio::test]
    async fn customers_sort_by_name_ignoring_case() {
        let backend = spawn_backend();
        let server = logged_in_console(&backend).await;

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status_ok();
        let text = response.text();
        let first = text.find("anaru").expect("expected anaru in page");
        let second = text.find("Zoe").expect("expected Zoe in page");
        assert!(first < second, "anaru should come before Zoe");
    }

    #[tokio::test]
    async fn search_narrows_the_table_but_not_the_totals() {
        let backend = spawn_backend();
        let server = logged_in_console(&backend).await;

        let response = server
            .get(endpoints::DASHBOARD_VIEW)
            .add_query_param("search", "zoe")
            .await;

        response.assert_status_ok();
        let text = response.text();
        assert!(text.contains("Zoe"));
        assert!(!text.contains("anaru"));
        // Totals still cover every ledger.
        assert!(text.contains("₹160.00"));
    }

    #[tokio::test]
    async fn dashboard_requires_a_session() {
        let backend = spawn_backend();
        let state = AppState::new(
            backend.server_address().unwrap().as_str(),
            "foobar",
            Default::default(),
        );
        let server = TestServer::try_new(build_router(state)).expect("Could not create test server.");

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::ROOT);
    }

    #[tokio::test]
    async fn query_deserializes_with_missing_fields() {
        let query: super::DashboardQuery = Query::try_from_uri(
            &"/dashboard?search=mere".parse().unwrap(),
        )
        .unwrap()
        .0;

        assert_eq!(query.search.as_deref(), Some("mere"));
        assert!(query.sort.is_none());
    }
}
