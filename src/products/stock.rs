//! The endpoints for adjusting a product's stock level.

use axum::{
    Extension, Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error,
    alert::Alert,
    endpoints::{self, format_endpoint},
    gateway::Product,
    html::FORM_TEXT_INPUT_STYLE,
    products::{ProductsState, list::product_row},
    session::Session,
};

/// The fields from a stock adjustment form.
#[derive(Clone, Deserialize)]
pub struct StockAdjustmentData {
    /// The quantity as submitted, validated into a positive whole number on
    /// the server.
    pub quantity: String,
}

/// Parse a submitted quantity into a positive whole number.
///
/// # Errors
///
/// Returns [Error::InvalidQuantity] for anything that is not a whole number
/// greater than zero, before any request is made to the backend.
fn parse_quantity(raw: &str) -> Result<i64, Error> {
    match raw.trim().parse::<i64>() {
        Ok(quantity) if quantity > 0 => Ok(quantity),
        _ => Err(Error::InvalidQuantity(raw.to_owned())),
    }
}

/// The paired add/remove forms rendered inside a product row.
pub(super) fn stock_adjustment_forms(product: &Product) -> Markup {
    let add_action = format_endpoint(endpoints::ADD_STOCK_API, &product.id);
    let remove_action = format_endpoint(endpoints::REMOVE_STOCK_API, &product.id);
    let row_target = format!("#product-row-{}", product.id);

    let adjustment_form = |action: String, label: &str, button_id: String, input_id: String| {
        html! {
            form
                hx-post=(action)
                hx-target=(row_target)
                hx-swap="outerHTML"
                hx-target-error="#alert-container"
                hx-disabled-elt=(format!("#{input_id}, #{button_id}"))
                class="flex items-center gap-2"
            {
                input
                    type="number"
                    name="quantity"
                    id=(input_id)
                    min="1"
                    step="1"
                    class=(format!("{FORM_TEXT_INPUT_STYLE} w-20"))
                    required;

                button
                    type="submit"
                    id=(button_id)
                    class="text-sm font-medium text-blue-600 hover:text-blue-500 dark:text-blue-500"
                {
                    (label)
                }
            }
        }
    };

    html! {
        div class="flex flex-col gap-2"
        {
            (adjustment_form(
                add_action,
                "Add",
                format!("add-stock-button-{}", product.id),
                format!("add-stock-quantity-{}", product.id),
            ))
            (adjustment_form(
                remove_action,
                "Remove",
                format!("remove-stock-button-{}", product.id),
                format!("remove-stock-quantity-{}", product.id),
            ))
        }
    }
}

/// Reject adjustments to blocked products.
///
/// The list page already hides the controls for blocked products; this
/// checks the current flag again so a stale page cannot adjust a product
/// that was blocked after it rendered.
async fn ensure_not_blocked(
    state: &ProductsState,
    session: &Session,
    product_id: &str,
) -> Result<(), Response> {
    let product = match state.api.product(session, product_id).await {
        Ok(payload) => payload.value,
        Err(error) => return Err(error.into_alert_response()),
    };

    if product.blocked {
        return Err((
            StatusCode::FORBIDDEN,
            Alert::Error {
                message: "Product is blocked".to_owned(),
                details: format!("{} is not taking stock adjustments.", product.name),
            }
            .into_html(),
        )
            .into_response());
    }

    Ok(())
}

/// Respond with the product's refreshed row and a toast.
async fn refreshed_row_response(
    state: &ProductsState,
    session: &Session,
    product_id: &str,
    notice: Option<String>,
    fallback_message: &str,
) -> Response {
    let product = match state.api.product(session, product_id).await {
        Ok(payload) => payload.value,
        Err(error) => return error.into_alert_response(),
    };

    let alert = Alert::SuccessSimple {
        message: notice.unwrap_or_else(|| fallback_message.to_owned()),
    };

    html! {
        (product_row(&product, &state.api))
        (alert.into_oob_html())
    }
    .into_response()
}

/// Add stock to a product, then respond with its refreshed row.
pub async fn post_add_stock(
    State(state): State<ProductsState>,
    Extension(session): Extension<Session>,
    Path(product_id): Path<String>,
    Form(form): Form<StockAdjustmentData>,
) -> Response {
    let quantity = match parse_quantity(&form.quantity) {
        Ok(quantity) => quantity,
        Err(error) => return error.into_alert_response(),
    };

    if let Err(response) = ensure_not_blocked(&state, &session, &product_id).await {
        return response;
    }

    let notice = match state.api.add_stock(&session, &product_id, quantity).await {
        Ok(notice) => notice,
        Err(error) => return error.into_alert_response(),
    };

    refreshed_row_response(&state, &session, &product_id, notice, "Stock added.").await
}

/// Remove stock from a product, then respond with its refreshed row.
///
/// Whether there is enough stock to remove is the backend's call; its
/// rejection comes back as an error alert.
pub async fn post_remove_stock(
    State(state): State<ProductsState>,
    Extension(session): Extension<Session>,
    Path(product_id): Path<String>,
    Form(form): Form<StockAdjustmentData>,
) -> Response {
    let quantity = match parse_quantity(&form.quantity) {
        Ok(quantity) => quantity,
        Err(error) => return error.into_alert_response(),
    };

    if let Err(response) = ensure_not_blocked(&state, &session, &product_id).await {
        return response;
    }

    let notice = match state.api.remove_stock(&session, &product_id, quantity).await {
        Ok(notice) => notice,
        Err(error) => return error.into_alert_response(),
    };

    refreshed_row_response(&state, &session, &product_id, notice, "Stock removed.").await
}
