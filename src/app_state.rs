//! Implements a struct that holds the state of the REST server.

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};

use crate::{gateway::ApiClient, pagination::PaginationConfig};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The client for the backend API that owns all the data.
    pub api: ApiClient,

    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
}

impl AppState {
    /// Create a new [AppState] talking to the backend at `api_url`.
    ///
    /// `cookie_secret` seeds the key that signs and encrypts session cookies;
    /// restarting the server with the same secret keeps existing sessions
    /// valid.
    pub fn new(api_url: &str, cookie_secret: &str, pagination_config: PaginationConfig) -> Self {
        Self {
            cookie_key: create_cookie_key(cookie_secret),
            api: ApiClient::new(api_url),
            pagination_config,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret` string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
