//! The page and endpoint for setting up a new store.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, auth_card, base, link,
        loading_spinner,
    },
    log_in::LoginState,
};

fn register_form(store_name: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::REGISTER_API)
            hx-indicator="#indicator"
            hx-disabled-elt="#name, #password, #confirm_password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Store name" }

                input
                    type="text"
                    name="name"
                    id="name"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required
                    autofocus
                    value=(store_name);
            }

            div
            {
                label for="password" class=(FORM_LABEL_STYLE) { "Password" }

                input
                    type="password"
                    name="password"
                    id="password"
                    placeholder="••••••••"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required
                    minlength="8";
            }

            div
            {
                label for="confirm_password" class=(FORM_LABEL_STYLE) { "Confirm password" }

                input
                    type="password"
                    name="confirm_password"
                    id="confirm_password"
                    placeholder="••••••••"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;

                @if let Some(error_message) = error_message
                {
                    p class="text-red-500 text-base" { (error_message) }
                }
            }

            button
                type="submit" id="submit-button" tabindex="0"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Create store"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400" {
                "Already have a store? "
                a
                    href=(endpoints::ROOT) tabindex="0"
                    class="font-semibold leading-6 text-blue-600 hover:text-blue-500 dark:text-blue-500 dark:hover:text-blue-400"
                {
                  "Log in here"
                }
            }
        }
    }
}

/// Display the store creation page.
pub async fn get_register_page() -> Response {
    let content = auth_card("Create your store", &register_form("", None));
    base("Create Store", &content).into_response()
}

/// The raw data entered in the store creation form.
#[derive(Clone, Deserialize)]
pub struct RegisterData {
    /// The name of the new store.
    pub name: String,
    /// The password for the new store.
    pub password: String,
    /// A second copy of the password to catch typos.
    pub confirm_password: String,
}

/// Handler for store creation requests via the POST method.
///
/// On success the form is replaced with a confirmation and a link to the
/// log-in page. Otherwise the form is returned with an error message.
pub async fn post_register_store(
    State(state): State<LoginState>,
    Form(form): Form<RegisterData>,
) -> Response {
    if form.password != form.confirm_password {
        return register_form(&form.name, Some("The passwords do not match.")).into_response();
    }

    match state.api.create_store(&form.name, &form.password).await {
        Ok(payload) => {
            let message = payload
                .notice
                .unwrap_or_else(|| "Store created.".to_owned());

            html! {
                div class="space-y-4"
                {
                    p class="text-gray-900 dark:text-white" { (message) }
                    p { (link(endpoints::ROOT, "Log in to get started")) }
                }
            }
            .into_response()
        }
        Err(Error::Backend { status, message }) if status < 500 => {
            let error_message =
                message.unwrap_or_else(|| "The store could not be created.".to_owned());
            register_form(&form.name, Some(&error_message)).into_response()
        }
        Err(error) => {
            tracing::error!("Unhandled error while creating store: {error}");
            register_form(
                &form.name,
                Some("An internal error occurred. Please try again later."),
            )
            .into_response()
        }
    }
}

#[cfg(test)]
mod register_store_tests {
    use axum::{Json, Router, http::StatusCode, routing::post};
    use axum_test::{TestServer, TestServerConfig, Transport};
    use serde_json::json;

    use crate::{AppState, endpoints, routing::build_router};

    async fn stub_create_store(
        Json(body): Json<serde_json::Value>,
    ) -> (StatusCode, Json<serde_json::Value>) {
        if body["name"] == "Taken" {
            (
                StatusCode::CONFLICT,
                Json(json!({"message": "A store with that name already exists"})),
            )
        } else {
            (
                StatusCode::OK,
                Json(json!({"ok": true, "id": "store-9", "message": "Store created"})),
            )
        }
    }

    fn spawn_backend() -> TestServer {
        let app = Router::new().route("/auth/create-store", post(stub_create_store));
        let config = TestServerConfig {
            transport: Some(Transport::HttpRandomPort),
            ..TestServerConfig::default()
        };

        TestServer::try_new_with_config(app, config).expect("Could not create stub backend.")
    }

    fn console_for(backend: &TestServer) -> TestServer {
        let state = AppState::new(
            backend.server_address().unwrap().as_str(),
            "foobar",
            Default::default(),
        );

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn register_page_displays_form() {
        let backend = spawn_backend();
        let server = console_for(&backend);

        let response = server.get(endpoints::REGISTER_VIEW).await;

        response.assert_status_ok();
        let document = scraper::Html::parse_document(&response.text());
        for selector in [
            "input[name=name]",
            "input[name=password]",
            "input[name=confirm_password]",
        ] {
            let input_selector = scraper::Selector::parse(selector).unwrap();
            assert!(
                document.select(&input_selector).next().is_some(),
                "expected {selector} in register form"
            );
        }
    }

    #[tokio::test]
    async fn register_succeeds_and_links_to_log_in() {
        let backend = spawn_backend();
        let server = console_for(&backend);
        let form = [
            ("name", "My Store"),
            ("password", "hunter2hunter2"),
            ("confirm_password", "hunter2hunter2"),
        ];

        let response = server.post(endpoints::REGISTER_API).form(&form).await;

        response.assert_status_ok();
        response.assert_text_contains("Store created");
        let fragment = scraper::Html::parse_fragment(&response.text());
        let link_selector =
            scraper::Selector::parse(&format!("a[href=\"{}\"]", endpoints::ROOT)).unwrap();
        assert!(fragment.select(&link_selector).next().is_some());
    }

    #[tokio::test]
    async fn register_rejects_mismatched_passwords_without_calling_backend() {
        let backend = spawn_backend();
        let server = console_for(&backend);
        let form = [
            ("name", "My Store"),
            ("password", "hunter2hunter2"),
            ("confirm_password", "different"),
        ];

        let response = server.post(endpoints::REGISTER_API).form(&form).await;

        response.assert_status_ok();
        response.assert_text_contains("The passwords do not match.");
    }

    #[tokio::test]
    async fn register_shows_backend_rejection() {
        let backend = spawn_backend();
        let server = console_for(&backend);
        let form = [
            ("name", "Taken"),
            ("password", "hunter2hunter2"),
            ("confirm_password", "hunter2hunter2"),
        ];

        let response = server.post(endpoints::REGISTER_API).form(&form).await;

        response.assert_status_ok();
        response.assert_text_contains("A store with that name already exists");
    }
}
