//! This file defines the routes for displaying the log-in page and handling log-in requests.
//! The session module handles the lower level cookie logic.

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    endpoints,
    gateway::ApiClient,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, auth_card, base, loading_spinner},
    session::{DEFAULT_SESSION_DURATION, Session, session_from_cookies, set_session_cookies},
};

fn log_in_form(store_name: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-indicator="#indicator"
            hx-disabled-elt="#name, #password, #submit-button"
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
                "Log in"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400" {
                "Setting up a new store? "
                a
                    href=(endpoints::REGISTER_VIEW) tabindex="0"
                    class="font-semibold leading-6 text-blue-600 hover:text-blue-500 dark:text-blue-500 dark:hover:text-blue-400"
                {
                  "Create it here"
                }
            }
        }
    }
}

/// Display the log-in page, or skip straight to the dashboard when a session
/// is already established.
pub async fn get_log_in_page(jar: PrivateCookieJar) -> Response {
    if session_from_cookies(&jar).is_ok() {
        return Redirect::to(endpoints::DASHBOARD_VIEW).into_response();
    }

    let log_in_form = log_in_form("", None);
    let content = auth_card("Log in to your store", &log_in_form);
    base("Log In", &content).into_response()
}

/// The state needed to perform a login.
#[derive(Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The client for the backend API that checks the credentials.
    pub api: ApiClient,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            api: state.api.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect store name or password.";

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in, the session cookies are set and the client is
/// redirected to the dashboard page. Otherwise, the form is returned with an
/// error message explaining the problem.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(form): Form<LogInData>,
) -> Response {
    let login = match state.api.log_in(&form.name, &form.password).await {
        Ok(payload) => payload.value,
        Err(Error::Backend { status, message }) if status < 500 => {
            let error_message = message.unwrap_or_else(|| INVALID_CREDENTIALS_ERROR_MSG.to_owned());
            return log_in_form(&form.name, Some(&error_message)).into_response();
        }
        Err(error) => {
            tracing::error!("Unhandled error while logging in: {error}");
            return log_in_form(
                &form.name,
                Some("An internal error occurred. Please try again later."),
            )
            .into_response();
        }
    };

    let session = Session {
        token: login.token,
        store_id: login.store_id,
    };
    let updated_jar = set_session_cookies(jar, &session, DEFAULT_SESSION_DURATION);

    (
        StatusCode::SEE_OTHER,
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        updated_jar,
    )
        .into_response()
}

/// The raw data entered by the user in the log-in form.
///
/// The password is stored as a plain string. There is no need for validation
/// here since the backend is the one checking the credentials.
#[derive(Clone, Deserialize)]
pub struct LogInData {
    /// The store name entered during log-in.
    pub name: String,
    /// Password entered during log-in.
    pub password: String,
}
