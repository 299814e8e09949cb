//! The endpoint for appending a ledger entry.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar};
use maud::html;
use serde::Deserialize;

use crate::{
    Error,
    alert::Alert,
    entries::{
        EntriesState,
        page::{LedgerPageQuery, ledger_section_view},
    },
    gateway::{EntryKind, NewEntry},
    ledger::build_ledger_view,
    session::{Session, entry_grant_allows},
};

/// The fields from the add-entry form.
#[derive(Clone, Deserialize)]
pub struct AddEntryData {
    /// The customer's credential, carried as a hidden field from the
    /// verification step.
    pub password: String,
    /// The amount as submitted, validated into a positive number on the
    /// server.
    pub amount: String,
    /// Whether the entry is income or an expense.
    pub kind: EntryKind,
    /// Free-form text describing the transaction.
    #[serde(default)]
    pub description: String,
}

fn parse_amount(raw: &str) -> Result<f64, Response> {
    let rejection = |raw: &str| {
        (
            StatusCode::BAD_REQUEST,
            Alert::Error {
                message: "Invalid amount".to_owned(),
                details: format!("\"{raw}\" is not a positive amount."),
            }
            .into_html(),
        )
            .into_response()
    };

    match raw.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
        _ => Err(rejection(raw)),
    }
}

/// Append an entry to the customer's ledger, then respond with the refreshed
/// ledger section and a toast.
///
/// Requires an unexpired entry grant for this customer; without one the
/// request is rejected before anything is sent to the backend.
pub async fn post_add_entry(
    State(state): State<EntriesState>,
    jar: PrivateCookieJar,
    Extension(session): Extension<Session>,
    Path(customer_id): Path<String>,
    Form(form): Form<AddEntryData>,
) -> Response {
    if !entry_grant_allows(&jar, &customer_id) {
        return Error::GrantMissing.into_alert_response();
    }

    let amount = match parse_amount(&form.amount) {
        Ok(amount) => amount,
        Err(response) => return response,
    };

    let entry = NewEntry {
        password: form.password,
        amount,
        kind: form.kind,
        description: form.description.trim().to_owned(),
    };

    let notice = match state.api.add_entry(&session, &customer_id, &entry).await {
        Ok(notice) => notice,
        Err(error) => return error.into_alert_response(),
    };

    let customer = match state.api.customer(&session, &customer_id).await {
        Ok(customer) => customer,
        Err(error) => return error.into_alert_response(),
    };

    let query = LedgerPageQuery::default();
    let view = build_ledger_view(customer.entries, &query.to_ledger_query(), state.page_size);

    let alert = Alert::SuccessSimple {
        message: notice.unwrap_or_else(|| "Entry added.".to_owned()),
    };

    html! {
        (ledger_section_view(&customer.id, &view, &query, state.max_pages))
        (alert.into_oob_html())
    }
    .into_response()
}
