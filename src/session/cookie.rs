//! Session and entry-grant cookies.
//!
//! The session (bearer token + store id) lives in private cookies: encrypted
//! and signed, so the client can neither read nor forge them. The entry
//! grant is a short-lived capability issued after a customer's credential is
//! verified; the add-entry endpoint requires a matching grant instead of
//! trusting page navigation order.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime, format_description::well_known::Rfc3339};

use crate::Error;

pub(crate) const COOKIE_TOKEN: &str = "token";
pub(crate) const COOKIE_STORE_ID: &str = "store_id";
pub(crate) const COOKIE_ENTRY_GRANT: &str = "entry_grant";

/// How long a session lasts before the store has to log in again.
pub const DEFAULT_SESSION_DURATION: Duration = Duration::hours(12);
/// How long a verified customer credential authorizes entry creation.
pub(crate) const ENTRY_GRANT_DURATION: Duration = Duration::minutes(10);

/// The session context for a logged-in store.
///
/// Created on successful log-in or store creation, torn down on log-out.
/// Handlers receive it via an `Extension` inserted by the session guard, and
/// pass it to the data gateway explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The bearer token for backend requests.
    pub token: String,
    /// The id of the store tenant that all customer and product queries are
    /// scoped to.
    pub store_id: String,
}

fn session_cookie(name: &'static str, value: String, expiry: OffsetDateTime) -> Cookie<'static> {
    Cookie::build((name, value))
        .expires(expiry)
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(true)
        .path("/")
        .build()
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, "deleted"))
        .expires(OffsetDateTime::UNIX_EPOCH)
        .max_age(Duration::ZERO)
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(true)
        .path("/")
        .build()
}

/// Store `session` in the cookie jar, valid for `duration` from now.
pub fn set_session_cookies(
    jar: PrivateCookieJar,
    session: &Session,
    duration: Duration,
) -> PrivateCookieJar {
    let expiry = OffsetDateTime::now_utc() + duration;

    jar.add(session_cookie(COOKIE_TOKEN, session.token.clone(), expiry))
        .add(session_cookie(
            COOKIE_STORE_ID,
            session.store_id.clone(),
            expiry,
        ))
}

/// Read the session out of the cookie jar.
///
/// # Errors
///
/// Returns [Error::SessionMissing] if either cookie is absent or empty.
pub fn session_from_cookies(jar: &PrivateCookieJar) -> Result<Session, Error> {
    let token = jar
        .get(COOKIE_TOKEN)
        .map(|cookie| cookie.value_trimmed().to_owned())
        .filter(|token| !token.is_empty())
        .ok_or(Error::SessionMissing)?;
    let store_id = jar
        .get(COOKIE_STORE_ID)
        .map(|cookie| cookie.value_trimmed().to_owned())
        .filter(|store_id| !store_id.is_empty())
        .ok_or(Error::SessionMissing)?;

    Ok(Session { token, store_id })
}

/// Remove the session and any entry grant, which should delete the cookies
/// on the client side.
pub fn clear_session_cookies(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(removal_cookie(COOKIE_TOKEN))
        .add(removal_cookie(COOKIE_STORE_ID))
        .add(removal_cookie(COOKIE_ENTRY_GRANT))
}

/// Issue an entry grant for `customer_id`, replacing any previous grant.
///
/// # Errors
///
/// Returns [Error::InvalidDateFormat] if the expiry cannot be formatted,
/// leaving the jar unmodified.
pub fn set_entry_grant(
    jar: PrivateCookieJar,
    customer_id: &str,
) -> Result<PrivateCookieJar, Error> {
    let expiry = OffsetDateTime::now_utc() + ENTRY_GRANT_DURATION;
    let expiry_string = expiry
        .format(&Rfc3339)
        .map_err(|error| Error::InvalidDateFormat(error.to_string()))?;

    Ok(jar.add(session_cookie(
        COOKIE_ENTRY_GRANT,
        format!("{customer_id}|{expiry_string}"),
        expiry,
    )))
}

/// Whether the jar holds an unexpired entry grant for `customer_id`.
pub fn entry_grant_allows(jar: &PrivateCookieJar, customer_id: &str) -> bool {
    let Some(cookie) = jar.get(COOKIE_ENTRY_GRANT) else {
        return false;
    };
    let Some((granted_id, expiry_string)) = cookie.value_trimmed().rsplit_once('|') else {
        return false;
    };
    let Ok(expiry) = OffsetDateTime::parse(expiry_string, &Rfc3339) else {
        return false;
    };

    granted_id == customer_id && expiry > OffsetDateTime::now_utc()
}
