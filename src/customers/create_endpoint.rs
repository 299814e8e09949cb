//! The endpoint for adding a customer to the roster.

use axum::{
    Extension, Form,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::html;
use serde::Deserialize;

use crate::{
    alert::Alert,
    customers::{CustomersState, page::customer_roster_view},
    session::Session,
};

/// The fields from the add-customer form.
#[derive(Clone, Deserialize)]
pub struct NewCustomerData {
    /// The customer's display name.
    pub name: String,
    /// The credential the customer will use to authorize ledger entries.
    pub password: String,
}

/// Create a customer, then respond with the refreshed roster and a toast.
pub async fn post_create_customer(
    State(state): State<CustomersState>,
    Extension(session): Extension<Session>,
    Form(form): Form<NewCustomerData>,
) -> Response {
    let name = form.name.trim();
    if name.is_empty() {
        return Alert::ErrorSimple {
            message: "The customer needs a name.".to_owned(),
        }
        .into_html()
        .into_response();
    }

    let notice = match state.api.create_customer(&session, name, &form.password).await {
        Ok(notice) => notice,
        Err(error) => return error.into_alert_response(),
    };

    let customers = match state.api.customers(&session).await {
        Ok(payload) => payload.value,
        Err(error) => return error.into_alert_response(),
    };

    let alert = Alert::SuccessSimple {
        message: notice.unwrap_or_else(|| format!("Added {name}.")),
    };

    html! {
        (customer_roster_view(&customers))
        (alert.into_oob_html())
    }
    .into_response()
}

#[cfg(test)]
mod create_customer_tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use axum::{
        Json, Router,
        extract::{Query, State as AxumState},
        http::StatusCode,
        routing::{get, post},
    };
    use axum_test::{TestServer, TestServerConfig, Transport};
    use serde_json::json;

    use crate::{AppState, endpoints, routing::build_router};

    #[derive(Clone, Default)]
    struct BackendCalls {
        creates: Arc<AtomicUsize>,
    }

    async fn stub_log_in() -> Json<serde_json::Value> {
        Json(json!({"token": "token-1", "storeId": "store-1"}))
    }

    async fn stub_customers(
        Query(query): Query<serde_json::Value>,
    ) -> Json<serde_json::Value> {
        assert_eq!(query["storeId"], "store-1");

        Json(json!([
            {"_id": "c1", "name": "Mere", "entries": []}
        ]))
    }

    async fn stub_create(
        AxumState(calls): AxumState<BackendCalls>,
        Json(body): Json<serde_json::Value>,
    ) -> (StatusCode, Json<serde_json::Value>) {
        calls.creates.fetch_add(1, Ordering::SeqCst);

        if body["name"] == "Mere" {
            (
                StatusCode::CONFLICT,
                Json(json!({"message": "That customer already exists"})),
            )
        } else {
            (StatusCode::OK, Json(json!({"message": "Customer added"})))
        }
    }

    fn spawn_backend(calls: BackendCalls) -> TestServer {
        let app = Router::new()
            .route("/auth/login", post(stub_log_in))
            .route("/users", get(stub_customers).post(stub_create))
            .with_state(calls);
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
    async fn creating_a_customer_returns_the_refreshed_roster() {
        let calls = BackendCalls::default();
        let backend = spawn_backend(calls.clone());
        let server = logged_in_console(&backend).await;
        let form = [("name", "Anaru"), ("password", "hunter2")];

        let response = server.post(endpoints::CUSTOMERS_API).form(&form).await;

        response.assert_status_ok();
        response.assert_text_contains("Mere");
        response.assert_text_contains("Customer added");
        assert_eq!(calls.creates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn backend_rejection_becomes_an_error_alert() {
        let calls = BackendCalls::default();
        let backend = spawn_backend(calls.clone());
        let server = logged_in_console(&backend).await;
        let form = [("name", "Mere"), ("password", "hunter2")];

        let response = server.post(endpoints::CUSTOMERS_API).form(&form).await;

        response.assert_status(StatusCode::CONFLICT);
        response.assert_text_contains("That customer already exists");
    }

    #[tokio::test]
    async fn blank_names_are_rejected_without_calling_the_backend() {
        let calls = BackendCalls::default();
        let backend = spawn_backend(calls.clone());
        let server = logged_in_console(&backend).await;
        let form = [("name", "   "), ("password", "hunter2")];

        let response = server.post(endpoints::CUSTOMERS_API).form(&form).await;

        response.assert_status_ok();
        response.assert_text_contains("The customer needs a name.");
        assert_eq!(calls.creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn customers_page_lists_the_roster() {
        let backend = spawn_backend(BackendCalls::default());
        let server = logged_in_console(&backend).await;

        let response = server.get(endpoints::CUSTOMERS_VIEW).await;

        response.assert_status_ok();
        response.assert_text_contains("Mere");
        let document = scraper::Html::parse_document(&response.text());
        let form_selector = scraper::Selector::parse(&format!(
            "form[hx-post=\"{}\"]",
            endpoints::CUSTOMERS_API
        ))
        .unwrap();
        assert!(document.select(&form_selector).next().is_some());
    }
}
