//! The customers page: the store's customer roster and the form for adding
//! to it.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    customers::CustomersState,
    endpoints::{self, format_endpoint},
    gateway::{Customer, CustomerStatus},
    html::{
        BADGE_BLOCKED_STYLE, BADGE_OK_STYLE, BADGE_WARN_STYLE, BUTTON_PRIMARY_STYLE,
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, loading_spinner,
    },
    navigation::NavBar,
    session::Session,
};

/// Display the customer roster with the form for adding a new customer.
pub async fn get_customers_page(
    State(state): State<CustomersState>,
    Extension(session): Extension<Session>,
) -> Result<Response, Error> {
    let customers = state.api.customers(&session).await?.value;

    let nav_bar = NavBar::new(endpoints::CUSTOMERS_VIEW);
    let content = html! {
        (nav_bar.into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-6" { "Customers" }

            (new_customer_form())

            div id="customer-list" class="w-full"
            {
                (customer_roster_view(&customers))
            }
        }
    };

    Ok(base("Customers", &content).into_response())
}

/// The form for adding a customer to the roster.
///
/// Submits over HTMX and swaps the refreshed roster into `#customer-list`;
/// the inputs are disabled while the request is in flight so a slow backend
/// cannot be asked twice.
pub(super) fn new_customer_form() -> Markup {
    html! {
        form
            hx-post=(endpoints::CUSTOMERS_API)
            hx-target="#customer-list"
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-disabled-elt="#customer-name, #customer-password, #add-customer-button"
            class="w-full max-w-md flex flex-col gap-4 mb-8"
        {
            div
            {
                label for="customer-name" class=(FORM_LABEL_STYLE) { "Name" }

                input
                    type="text"
                    name="name"
                    id="customer-name"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;
            }

            div
            {
                label for="customer-password" class=(FORM_LABEL_STYLE) { "Ledger password" }

                input
                    type="password"
                    name="password"
                    id="customer-password"
                    placeholder="••••••••"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;
            }

            button type="submit" id="add-customer-button" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator" { (loading_spinner()) }
                "Add customer"
            }
        }
    }
}

fn status_badge(status: Option<CustomerStatus>) -> Markup {
    let (style, label) = match status.unwrap_or_default() {
        CustomerStatus::Active => (BADGE_OK_STYLE, "Active"),
        CustomerStatus::Inactive => (BADGE_WARN_STYLE, "Inactive"),
        CustomerStatus::Blocked => (BADGE_BLOCKED_STYLE, "Blocked"),
    };

    html!( span class=(style) { (label) } )
}

/// The roster table fragment that fills `#customer-list`.
pub(super) fn customer_roster_view(customers: &[Customer]) -> Markup {
    if customers.is_empty() {
        return html! {
            p class="text-gray-600 dark:text-gray-400 py-8 text-center"
            {
                "No customers yet. Add the first one above."
            }
        };
    }

    html! {
        div class="w-full overflow-x-auto shadow-md rounded"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Contact" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "" }
                    }
                }

                tbody
                {
                    @for customer in customers {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (customer.name) }
                            td class=(TABLE_CELL_STYLE) { (customer.contact.as_deref().unwrap_or("—")) }
                            td class=(TABLE_CELL_STYLE) { (status_badge(customer.status)) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                div class="flex gap-4"
                                {
                                    a
                                        href=(format_endpoint(endpoints::CUSTOMER_ENTRIES_VIEW, &customer.id))
                                        class=(LINK_STYLE)
                                    {
                                        "Ledger"
                                    }

                                    // The entry panel on the ledger page holds
                                    // the credential prompt.
                                    a
                                        href=(format!(
                                            "{}#entry-panel",
                                            format_endpoint(endpoints::CUSTOMER_ENTRIES_VIEW, &customer.id)
                                        ))
                                        class=(LINK_STYLE)
                                    {
                                        "Add entry"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
