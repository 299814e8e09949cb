//! The stock history page for a single product.
//!
//! Unlike the ledger, history filtering happens on the backend: the date and
//! type filters are forwarded with the query and the response is rendered
//! as-is.

use axum::{
    Extension,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::{
    Error,
    endpoints::{self, format_endpoint},
    gateway::{HistoryFilter, StockEvent, StockEventKind},
    html::{
        BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, link,
    },
    navigation::NavBar,
    products::ProductsState,
    session::Session,
};

const EVENT_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[day]/[month]/[year] [hour]:[minute]");

/// Which stock events to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventFilter {
    /// Both additions and removals.
    #[default]
    All,
    /// Only stock additions.
    Add,
    /// Only stock removals.
    Remove,
}

impl EventFilter {
    fn as_str(&self) -> &'static str {
        match self {
            EventFilter::All => "all",
            EventFilter::Add => "add",
            EventFilter::Remove => "remove",
        }
    }

    fn to_kind(self) -> Option<StockEventKind> {
        match self {
            EventFilter::All => None,
            EventFilter::Add => Some(StockEventKind::Add),
            EventFilter::Remove => Some(StockEventKind::Remove),
        }
    }
}

/// The query string of the history page. Dates stay as submitted; the
/// backend owns their interpretation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryPageQuery {
    /// Inclusive lower bound as a 'YYYY-MM-DD' string.
    pub from: Option<String>,
    /// Inclusive upper bound as a 'YYYY-MM-DD' string.
    pub to: Option<String>,
    /// Which event kinds to show.
    pub kind: Option<EventFilter>,
}

impl HistoryPageQuery {
    fn to_filter(&self) -> HistoryFilter {
        let not_blank = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(ToOwned::to_owned)
        };

        HistoryFilter {
            from: not_blank(&self.from),
            to: not_blank(&self.to),
            kind: self.kind.unwrap_or_default().to_kind(),
        }
    }
}

/// Display a product's stock history.
pub async fn get_product_history_page(
    State(state): State<ProductsState>,
    Extension(session): Extension<Session>,
    Path(product_id): Path<String>,
    Query(query): Query<HistoryPageQuery>,
) -> Result<Response, Error> {
    let product = state.api.product(&session, &product_id).await?.value;
    let events = state
        .api
        .stock_history(&session, &product_id, &query.to_filter())
        .await?
        .value;

    let nav_bar = NavBar::new(endpoints::PRODUCTS_VIEW);
    let content = html! {
        (nav_bar.into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-2" { (product.name) }
            p class="text-sm text-gray-600 dark:text-gray-400 mb-6"
            {
                "Stock history · currently " (product.quantity) " in stock · "
                (link(endpoints::PRODUCTS_VIEW, "back to products"))
            }

            (filter_form(&product.id, &query))
            (history_table(&events))
        }
    };

    Ok(base("Stock History", &content).into_response())
}

fn filter_form(product_id: &str, query: &HistoryPageQuery) -> Markup {
    let action = format_endpoint(endpoints::PRODUCT_HISTORY_VIEW, product_id);
    let kind = query.kind.unwrap_or_default();
    let kind_options = [
        (EventFilter::All, "All"),
        (EventFilter::Add, "Additions"),
        (EventFilter::Remove, "Removals"),
    ];

    html! {
        form method="get" action=(action) class="w-full flex flex-wrap items-end gap-4 mb-4"
        {
            div
            {
                label for="from" class=(FORM_LABEL_STYLE) { "From" }

                input
                    type="date"
                    name="from"
                    id="from"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=(query.from.as_deref().unwrap_or(""));
            }

            div
            {
                label for="to" class=(FORM_LABEL_STYLE) { "To" }

                input
                    type="date"
                    name="to"
                    id="to"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=(query.to.as_deref().unwrap_or(""));
            }

            div
            {
                label for="kind" class=(FORM_LABEL_STYLE) { "Type" }

                select name="kind" id="kind" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for (option, label) in kind_options {
                        option value=(option.as_str()) selected[option == kind] { (label) }
                    }
                }
            }

            button type="submit" class=(format!("{BUTTON_SECONDARY_STYLE} w-auto")) { "Apply" }
        }
    }
}

fn event_row(event: &StockEvent) -> Markup {
    let (amount_class, sign, label) = match event.kind {
        StockEventKind::Add => ("text-green-600 dark:text-green-400", "+", "Added"),
        StockEventKind::Remove => ("text-red-600 dark:text-red-400", "-", "Removed"),
    };
    let occurred_at = event
        .occurred_at
        .format(EVENT_DATE_FORMAT)
        .unwrap_or_else(|_| event.occurred_at.to_string());

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (occurred_at) }
            td class=(TABLE_CELL_STYLE) { (label) }
            td class=(format!("{TABLE_CELL_STYLE} text-right {amount_class}"))
            {
                (sign) (event.magnitude)
            }
        }
    }
}

fn history_table(events: &[StockEvent]) -> Markup {
    if events.is_empty() {
        return html! {
            p class="text-gray-600 dark:text-gray-400 py-8 text-center"
            {
                "No stock events match the current filters."
            }
        };
    }

    html! {
        div class="w-full overflow-x-auto shadow-md rounded"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "When" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Event" }
                        th scope="col" class=(format!("{TABLE_CELL_STYLE} text-right")) { "Quantity" }
                    }
                }

                tbody
                {
                    @for event in events {
                        (event_row(event))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod stock_history_tests {
    use axum::{
        Json, Router,
        extract::Query,
        routing::{get, post},
    };
    use axum_test::{TestServer, TestServerConfig, Transport};
    use serde_json::{Value, json};

    use crate::{AppState, endpoints, routing::build_router};

    async fn stub_log_in() -> Json<Value> {
        Json(json!({"token": "token-1", "storeId": "store-1"}))
    }

    async fn stub_product() -> Json<Value> {
        Json(json!({
            "_id": "p1",
            "name": "Cotton Saree",
            "quantity": 17,
            "thresholdLow": 10,
            "thresholdCritical": 3,
        }))
    }

    async fn stub_history(Query(query): Query<Value>) -> Json<Value> {
        let mut events = vec![
            json!({"date": "2024-05-01T10:00:00Z", "type": "add", "addedQuantity": 20}),
            json!({"date": "2024-05-03T16:30:00Z", "type": "remove", "addedQuantity": 3}),
        ];

        if query.get("type").map(|kind| kind == "remove").unwrap_or(false) {
            events.retain(|event| event["type"] == "remove");
        }

        Json(json!(events))
    }

    fn spawn_backend() -> TestServer {
        let app = Router::new()
            .route("/auth/login", post(stub_log_in))
            .route("/products/p1", get(stub_product))
            .route("/products/p1/history", get(stub_history));
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
    async fn history_shows_signed_quantities() {
        let backend = spawn_backend();
        let server = logged_in_console(&backend).await;

        let response = server.get("/products/p1/history").await;

        response.assert_status_ok();
        let text = response.text();
        assert!(text.contains("Cotton Saree"));
        assert!(text.contains("+20"));
        assert!(text.contains("-3"));
        assert!(text.contains("01/05/2024 10:00"));
    }

    #[tokio::test]
    async fn type_filter_is_forwarded_to_the_backend() {
        let backend = spawn_backend();
        let server = logged_in_console(&backend).await;

        let response = server
            .get("/products/p1/history")
            .add_query_param("kind", "remove")
            .await;

        response.assert_status_ok();
        let text = response.text();
        assert!(text.contains("-3"));
        assert!(!text.contains("+20"));
    }
}
