//! ShopLedger is a web console for small stores to manage customer ledgers
//! and product stock.
//!
//! The console keeps no data of its own: every page is rendered from the
//! remote backend API, and every mutation is forwarded to it. This library
//! provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod customers;
mod dashboard;
mod endpoints;
mod entries;
mod gateway;
mod html;
mod internal_server_error;
mod ledger;
mod log_in;
mod log_out;
mod logging;
mod navigation;
mod not_found;
mod pagination;
mod products;
mod register_store;
mod routing;
mod session;

pub use app_state::AppState;
pub use gateway::ApiClient;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

use crate::{
    alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundError,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The session cookies are missing from the request, or one of them is
    /// empty. The client should log in again.
    #[error("no session in the cookie jar")]
    SessionMissing,

    /// An entry was submitted without a matching, unexpired entry grant.
    ///
    /// Grants are issued when a customer's credential is verified and expire
    /// after a few minutes, so this usually means the form sat open too long.
    #[error("no entry grant for this customer")]
    GrantMissing,

    /// The backend answered with a non-success status code.
    ///
    /// `message` holds the human-readable notice from the response body, if
    /// the backend sent one.
    #[error("backend returned status {status}")]
    Backend {
        /// The HTTP status code of the backend response.
        status: u16,
        /// The notice from the response body, if any.
        message: Option<String>,
    },

    /// The backend could not be reached at all.
    #[error("could not reach the backend: {0}")]
    Network(String),

    /// The backend answered with a body that could not be parsed into the
    /// expected shape.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("could not parse backend response: {0}")]
    InvalidResponse(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A stock adjustment was submitted with a quantity that is not a
    /// positive number.
    ///
    /// Rejected before any request is made to the backend.
    #[error("\"{0}\" is not a valid stock quantity")]
    InvalidQuantity(String),

    /// A date filter could not be parsed or formatted.
    #[error("could not handle date string: {0}")]
    InvalidDateFormat(String),

    /// The multipart form for creating a product could not be parsed.
    #[error("could not parse multipart form: {0}")]
    MultipartError(String),

    /// The uploaded product image was rejected before being forwarded.
    #[error("invalid image upload: {0}")]
    InvalidUpload(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::SessionMissing => Redirect::to(endpoints::ROOT).into_response(),
            Error::Network(details) => {
                tracing::error!("Could not reach the backend: {details}");
                InternalServerError {
                    description: "The server is unreachable.",
                    fix: "Check that the backend API is running, then try again.",
                }
                .into_response()
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::Backend { status, message } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                Alert::ErrorSimple {
                    message: message
                        .unwrap_or_else(|| "The server rejected the request.".to_owned()),
                },
            ),
            Error::Network(details) => {
                tracing::error!("Could not reach the backend: {details}");

                (
                    StatusCode::BAD_GATEWAY,
                    Alert::Error {
                        message: "Could not reach the server".to_owned(),
                        details: "Check your connection and try again.".to_owned(),
                    },
                )
            }
            Error::GrantMissing => (
                StatusCode::FORBIDDEN,
                Alert::Error {
                    message: "Verification required".to_owned(),
                    details: "Verify the customer's password again before adding an entry."
                        .to_owned(),
                },
            ),
            Error::InvalidQuantity(value) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid quantity".to_owned(),
                    details: format!("\"{value}\" is not a positive whole number."),
                },
            ),
            Error::InvalidUpload(details) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid image".to_owned(),
                    details,
                },
            ),
            Error::MultipartError(details) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Could not read the form".to_owned(),
                    details,
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::ErrorSimple {
                    message: "The requested item could not be found. \
                        Try refreshing the page."
                        .to_owned(),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {error}");

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}
