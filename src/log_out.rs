//! Route handler for logging out.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;

use crate::{endpoints, session::clear_session_cookies};

/// Tear down the session and any entry grant, then return to the log-in page.
pub async fn get_log_out(jar: PrivateCookieJar) -> Response {
    let jar = clear_session_cookies(jar);

    (jar, Redirect::to(endpoints::ROOT)).into_response()
}

#[cfg(test)]
mod log_out_tests {
    use axum::{Router, middleware, response::Html, routing::get};
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use axum_test::TestServer;
    use sha2::Digest;

    use crate::{
        endpoints,
        session::{
            DEFAULT_SESSION_DURATION, Session, SessionState, session_guard, set_session_cookies,
        },
    };

    use super::get_log_out;

    const TEST_PROTECTED_ROUTE: &str = "/protected";
    const TEST_LOG_IN_ROUTE: &str = "/log_in";

    async fn stub_log_in_route(jar: PrivateCookieJar) -> PrivateCookieJar {
        let session = Session {
            token: "sesame".to_owned(),
            store_id: "store-1".to_owned(),
        };

        set_session_cookies(jar, &session, DEFAULT_SESSION_DURATION)
    }

    async fn protected() -> Html<&'static str> {
        Html("<h1>ok</h1>")
    }

    fn get_test_server() -> TestServer {
        let hash = sha2::Sha512::digest("nafstenoas");
        let state = SessionState {
            cookie_key: Key::from(&hash),
        };

        let app = Router::new()
            .route(TEST_PROTECTED_ROUTE, get(protected))
            .route_layer(middleware::from_fn_with_state(state.clone(), session_guard))
            .route(TEST_LOG_IN_ROUTE, get(stub_log_in_route))
            .route(endpoints::LOG_OUT, get(get_log_out))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn log_out_redirects_to_log_in_page() {
        let server = get_test_server();

        let response = server.get(endpoints::LOG_OUT).await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::ROOT);
    }

    #[tokio::test]
    async fn log_out_invalidates_the_session() {
        let server = get_test_server();
        let cookies = server.get(TEST_LOG_IN_ROUTE).await.cookies();

        server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookies(cookies.clone())
            .await
            .assert_status_ok();

        let response = server
            .get(endpoints::LOG_OUT)
            .add_cookies(cookies)
            .await;
        let cleared = response.cookies();

        server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookies(cleared)
            .await
            .assert_status_see_other();
    }
}
