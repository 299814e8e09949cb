//! Session management for the store console.
//!
//! A session is established by logging in (or creating a store) and carried
//! in private cookies. The session guard turns those cookies back into a
//! [Session] for route handlers; the entry grant adds a second, short-lived
//! capability required for appending ledger entries.

pub(crate) mod cookie;
mod middleware;

pub use cookie::{
    DEFAULT_SESSION_DURATION, Session, clear_session_cookies, entry_grant_allows,
    session_from_cookies, set_entry_grant, set_session_cookies,
};
pub use middleware::{SessionState, session_guard, session_guard_hx};
