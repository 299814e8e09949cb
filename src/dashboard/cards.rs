//! Card components for the store-wide totals at the top of the dashboard.

use maud::{Markup, html};

use crate::{dashboard::summary::StoreSummary, html::format_currency};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md flex flex-col gap-1";

fn summary_card(label: &str, value: &str, value_class: &str) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            span class="text-sm text-gray-600 dark:text-gray-400" { (label) }
            span class=(format!("text-2xl font-semibold {value_class}")) { (value) }
        }
    }
}

/// Renders the row of store-wide total cards.
pub(super) fn summary_cards_view(summary: &StoreSummary) -> Markup {
    let net_class = if summary.net < 0.0 {
        "text-red-600 dark:text-red-400"
    } else {
        "text-green-600 dark:text-green-400"
    };

    html! {
        section class="w-full grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4 mb-8"
        {
            (summary_card("Customers", &summary.customer_count.to_string(), ""))
            (summary_card("Total income", &format_currency(summary.income), ""))
            (summary_card("Total expenses", &format_currency(summary.expense), ""))
            (summary_card("Net balance", &format_currency(summary.net), net_class))
        }
    }
}
