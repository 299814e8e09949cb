//! The customer table shown on the dashboard.

use maud::{Markup, html};

use crate::{
    dashboard::customers::total_spent,
    endpoints::{self, format_endpoint},
    gateway::{Customer, CustomerStatus},
    html::{
        BADGE_BLOCKED_STYLE, BADGE_OK_STYLE, BADGE_WARN_STYLE, LINK_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency,
    },
};

fn status_badge(status: Option<CustomerStatus>) -> Markup {
    let (style, label) = match status.unwrap_or_default() {
        CustomerStatus::Active => (BADGE_OK_STYLE, "Active"),
        CustomerStatus::Inactive => (BADGE_WARN_STYLE, "Inactive"),
        CustomerStatus::Blocked => (BADGE_BLOCKED_STYLE, "Blocked"),
    };

    html!( span class=(style) { (label) } )
}

fn customer_row(customer: &Customer) -> Markup {
    let ledger_url = format_endpoint(endpoints::CUSTOMER_ENTRIES_VIEW, &customer.id);

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (customer.name) }
            td class=(TABLE_CELL_STYLE) { (customer.contact.as_deref().unwrap_or("—")) }
            td class=(format!("{TABLE_CELL_STYLE} text-right"))
            {
                @match customer.orders {
                    Some(orders) => { (orders) }
                    None => { "—" }
                }
            }
            td class=(format!("{TABLE_CELL_STYLE} text-right")) { (format_currency(total_spent(customer))) }
            td class=(TABLE_CELL_STYLE) { (status_badge(customer.status)) }
            td class=(TABLE_CELL_STYLE)
            {
                a href=(ledger_url) class=(LINK_STYLE) { "Ledger" }
            }
        }
    }
}

/// Renders the customer table, or an empty state when the store has no
/// customers matching the search.
pub(super) fn customer_table_view(customers: &[Customer]) -> Markup {
    if customers.is_empty() {
        return html! {
            p class="text-gray-600 dark:text-gray-400 py-8 text-center"
            {
                "No customers found. Add your first customer from the "
                a href=(endpoints::CUSTOMERS_VIEW) class=(LINK_STYLE) { "customers page" }
                "."
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
                        th scope="col" class=(format!("{TABLE_CELL_STYLE} text-right")) { "Orders" }
                        th scope="col" class=(format!("{TABLE_CELL_STYLE} text-right")) { "Spent" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "" }
                    }
                }

                tbody
                {
                    @for customer in customers {
                        (customer_row(customer))
                    }
                }
            }
        }
    }
}
