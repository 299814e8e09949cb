//! The endpoint that verifies a customer's credential and unlocks the
//! add-entry form.
//!
//! On success it issues a short-lived entry grant cookie and swaps the
//! add-entry form into `#entry-panel`. The verified password travels back to
//! the client inside the form as a hidden field, because the backend requires
//! it again with every entry.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    alert::Alert,
    endpoints::{self, format_endpoint},
    entries::EntriesState,
    gateway::EntryKind,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, loading_spinner,
    },
    session::{Session, set_entry_grant},
};

/// The fields from the verification form.
#[derive(Clone, Deserialize)]
pub struct VerifyData {
    /// The customer's ledger password.
    pub password: String,
}

/// Verify the customer's password against the backend; on success, issue an
/// entry grant and respond with the unlocked add-entry form.
pub async fn post_verify_customer(
    State(state): State<EntriesState>,
    jar: PrivateCookieJar,
    Extension(session): Extension<Session>,
    Path(customer_id): Path<String>,
    Form(form): Form<VerifyData>,
) -> Response {
    let notice = match state
        .api
        .verify_customer(&session, &customer_id, &form.password)
        .await
    {
        Ok(notice) => notice,
        Err(error) => return error.into_alert_response(),
    };

    let jar = match set_entry_grant(jar, &customer_id) {
        Ok(jar) => jar,
        Err(error) => return error.into_alert_response(),
    };

    let alert = Alert::SuccessSimple {
        message: notice.unwrap_or_else(|| "Customer verified.".to_owned()),
    };

    (
        jar,
        html! {
            (add_entry_form(&customer_id, &form.password))
            (alert.into_oob_html())
        },
    )
        .into_response()
}

/// The unlocked state of the entry panel.
///
/// Carries the verified password as a hidden input because each entry must
/// re-present it to the backend. The amount is a text field validated on the
/// server, so a garbled value gets an alert instead of silent coercion.
fn add_entry_form(customer_id: &str, password: &str) -> Markup {
    let action = format_endpoint(endpoints::ENTRIES_API, customer_id);

    html! {
        form
            hx-post=(action)
            hx-target="#ledger-section"
            hx-target-error="#alert-container"
            hx-indicator="#entry-indicator"
            hx-disabled-elt="#entry-amount, #entry-description, #add-entry-button"
            class="flex flex-col gap-4"
        {
            h2 class="text-lg font-semibold" { "Add an entry" }

            input type="hidden" name="password" value=(password);

            div
            {
                label for="entry-amount" class=(FORM_LABEL_STYLE) { "Amount" }

                input
                    type="number"
                    name="amount"
                    id="entry-amount"
                    min="0.01"
                    step="0.01"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;
            }

            fieldset class="flex gap-6"
            {
                legend class=(FORM_LABEL_STYLE) { "Kind" }

                @for (kind, label) in [(EntryKind::Income, "Income"), (EntryKind::Expense, "Expense")] {
                    label class="flex items-center gap-2"
                    {
                        input
                            type="radio"
                            name="kind"
                            value=(kind.as_str())
                            checked[kind == EntryKind::Income];
                        (label)
                    }
                }
            }

            div
            {
                label for="entry-description" class=(FORM_LABEL_STYLE) { "Description" }

                input
                    type="text"
                    name="description"
                    id="entry-description"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" id="add-entry-button" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="entry-indicator" { (loading_spinner()) }
                "Add entry"
            }
        }
    }
}
