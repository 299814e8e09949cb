//! The page and endpoint for editing a product.
//!
//! Everything funnels through one PATCH-style endpoint: saving the editable
//! fields, toggling the blocked flag, and deletion, which the backend models
//! as a soft-delete field rather than an HTTP DELETE.

use axum::{
    Extension, Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::html;
use serde::Deserialize;

use crate::{
    Error,
    alert::Alert,
    endpoints::{self, format_endpoint},
    gateway::{Product, ProductPatch},
    html::{
        BUTTON_DANGER_STYLE, BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base, loading_spinner,
    },
    navigation::NavBar,
    products::ProductsState,
    session::Session,
};

/// What the edit form asks the endpoint to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditAction {
    /// Save the editable fields.
    Save,
    /// Stop the product from taking stock adjustments.
    Block,
    /// Allow stock adjustments again.
    Unblock,
    /// Soft-delete the product.
    Delete,
}

/// The fields from the edit-product forms.
#[derive(Clone, Deserialize)]
pub struct EditProductData {
    /// Which change to apply.
    pub action: EditAction,
    /// The product's display name, for [EditAction::Save].
    #[serde(default)]
    pub name: Option<String>,
    /// The low-stock threshold, for [EditAction::Save].
    #[serde(default)]
    pub threshold_low: Option<String>,
    /// The critical-stock threshold, for [EditAction::Save].
    #[serde(default)]
    pub threshold_critical: Option<String>,
}

/// Display the edit form for a product.
pub async fn get_edit_product_page(
    State(state): State<ProductsState>,
    Extension(session): Extension<Session>,
    Path(product_id): Path<String>,
) -> Result<Response, Error> {
    let product = state.api.product(&session, &product_id).await?.value;

    let nav_bar = NavBar::new(endpoints::PRODUCTS_VIEW);
    let content = html! {
        (nav_bar.into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-6" { "Edit " (product.name) }

            @if let Some(image) = &product.image {
                img
                    src=(state.api.file_url(image))
                    alt=(product.name)
                    class="w-24 h-24 object-cover rounded mb-6";
            }

            (edit_form(&product))
            (toggle_and_delete_forms(&product))
        }
    };

    Ok(base("Edit Product", &content).into_response())
}

fn edit_form(product: &Product) -> maud::Markup {
    let action = format_endpoint(endpoints::UPDATE_PRODUCT_API, &product.id);

    html! {
        form
            hx-post=(action)
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-disabled-elt="#product-name, #threshold-low, #threshold-critical, #save-product-button"
            class="w-full max-w-md flex flex-col gap-4 mb-8"
        {
            input type="hidden" name="action" value="save";

            div
            {
                label for="product-name" class=(FORM_LABEL_STYLE) { "Name" }

                input
                    type="text"
                    name="name"
                    id="product-name"
                    value=(product.name)
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;
            }

            div
            {
                label for="threshold-low" class=(FORM_LABEL_STYLE) { "Low stock threshold" }

                input
                    type="number"
                    name="threshold_low"
                    id="threshold-low"
                    min="0"
                    step="1"
                    value=(product.threshold_low)
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;
            }

            div
            {
                label for="threshold-critical" class=(FORM_LABEL_STYLE) { "Critical stock threshold" }

                input
                    type="number"
                    name="threshold_critical"
                    id="threshold-critical"
                    min="0"
                    step="1"
                    value=(product.threshold_critical)
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;
            }

            button type="submit" id="save-product-button" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator" { (loading_spinner()) }
                "Save"
            }
        }
    }
}

fn toggle_and_delete_forms(product: &Product) -> maud::Markup {
    let action = format_endpoint(endpoints::UPDATE_PRODUCT_API, &product.id);
    let (toggle_value, toggle_label) = if product.blocked {
        ("unblock", "Unblock product")
    } else {
        ("block", "Block product")
    };

    html! {
        div class="w-full max-w-md flex items-center gap-4"
        {
            form hx-post=(action) hx-target-error="#alert-container"
            {
                input type="hidden" name="action" value=(toggle_value);

                button type="submit" class=(format!("{BUTTON_SECONDARY_STYLE} w-auto")) { (toggle_label) }
            }

            form
                hx-post=(action)
                hx-target-error="#alert-container"
                hx-confirm=(format!("Delete {}? This cannot be undone.", product.name))
            {
                input type="hidden" name="action" value="delete";

                button type="submit" class=(BUTTON_DANGER_STYLE) { "Delete product" }
            }
        }
    }
}

fn rejection(details: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Alert::Error {
            message: "Could not save the product".to_owned(),
            details,
        }
        .into_html(),
    )
        .into_response()
}

fn parse_threshold(raw: Option<&str>, field: &str) -> Result<i64, Response> {
    let raw = raw.unwrap_or_default();

    match raw.trim().parse::<i64>() {
        Ok(count) if count >= 0 => Ok(count),
        _ => Err(rejection(format!(
            "The {field} must be a whole number of zero or more."
        ))),
    }
}

fn build_patch(form: &EditProductData) -> Result<ProductPatch, Response> {
    match form.action {
        EditAction::Save => {
            let name = form
                .name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .ok_or_else(|| rejection("The product needs a name.".to_owned()))?;

            Ok(ProductPatch {
                name: Some(name.to_owned()),
                threshold_low: Some(parse_threshold(
                    form.threshold_low.as_deref(),
                    "low stock threshold",
                )?),
                threshold_critical: Some(parse_threshold(
                    form.threshold_critical.as_deref(),
                    "critical stock threshold",
                )?),
                ..ProductPatch::default()
            })
        }
        EditAction::Block => Ok(ProductPatch {
            blocked: Some(true),
            ..ProductPatch::default()
        }),
        EditAction::Unblock => Ok(ProductPatch {
            blocked: Some(false),
            ..ProductPatch::default()
        }),
        EditAction::Delete => Ok(ProductPatch {
            delete: Some(true),
            ..ProductPatch::default()
        }),
    }
}

/// Apply an edit action to the product, then redirect to the product list.
pub async fn post_update_product(
    State(state): State<ProductsState>,
    Extension(session): Extension<Session>,
    Path(product_id): Path<String>,
    Form(form): Form<EditProductData>,
) -> Response {
    let patch = match build_patch(&form) {
        Ok(patch) => patch,
        Err(response) => return response,
    };

    if let Err(error) = state.api.update_product(&session, &product_id, &patch).await {
        return error.into_alert_response();
    }

    (
        StatusCode::SEE_OTHER,
        HxRedirect(endpoints::PRODUCTS_VIEW.to_owned()),
        (),
    )
        .into_response()
}
