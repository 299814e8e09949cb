//! The ledger page for a single customer.
//!
//! Shows the customer's entries newest first, with date and kind filters, a
//! paged table, and running totals. The totals always cover the complete
//! ledger, so narrowing the view never changes the displayed balance.

use axum::{
    Extension,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::{Date, format_description::well_known::Iso8601};

use crate::{
    Error,
    endpoints::{self, format_endpoint},
    entries::EntriesState,
    gateway::{Entry, EntryKind},
    html::{
        BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        format_currency,
    },
    ledger::{KindFilter, LedgerQuery, LedgerView, build_ledger_view, format_entry_date},
    navigation::NavBar,
    pagination::{PaginationIndicator, create_pagination_indicators},
    session::Session,
};

/// The raw query string of the ledger page. Dates stay as strings here so
/// the filter form can echo back exactly what was submitted.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LedgerPageQuery {
    /// Inclusive lower bound as a 'YYYY-MM-DD' string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    /// Inclusive upper bound as a 'YYYY-MM-DD' string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    /// Which entry kinds to show.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<KindFilter>,
    /// The page number, defaulting to the first page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
}

fn parse_filter_date(raw: Option<&str>, field: &str) -> Option<Date> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    match Date::parse(raw, &Iso8601::DEFAULT) {
        Ok(date) => Some(date),
        Err(error) => {
            tracing::warn!("Ignoring unparseable {field} filter \"{raw}\": {error}");
            None
        }
    }
}

impl LedgerPageQuery {
    /// Resolve the raw query into the typed filters the view model uses.
    pub(super) fn to_ledger_query(&self) -> LedgerQuery {
        LedgerQuery {
            date_from: parse_filter_date(self.date_from.as_deref(), "date_from"),
            date_to: parse_filter_date(self.date_to.as_deref(), "date_to"),
            kind: self.kind.unwrap_or_default(),
            page: self.page.unwrap_or(1),
        }
    }
}

/// Display a customer's ledger.
pub async fn get_customer_entries_page(
    State(state): State<EntriesState>,
    Extension(session): Extension<Session>,
    Path(customer_id): Path<String>,
    Query(query): Query<LedgerPageQuery>,
) -> Result<Response, Error> {
    let customer = state.api.customer(&session, &customer_id).await?;

    let view = build_ledger_view(customer.entries, &query.to_ledger_query(), state.page_size);

    let nav_bar = NavBar::new(endpoints::CUSTOMERS_VIEW);
    let content = html! {
        (nav_bar.into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-2" { (customer.name) }
            p class="text-sm text-gray-600 dark:text-gray-400 mb-6" { "Customer ledger" }

            (filter_form(&customer.id, &query))

            div id="ledger-section" class="w-full"
            {
                (ledger_section_view(&customer.id, &view, &query, state.max_pages))
            }

            div id="entry-panel" class="w-full max-w-md mt-8"
            {
                (verify_form(&customer.id))
            }
        }
    };

    Ok(base("Ledger", &content).into_response())
}

/// The date and kind filters above the ledger table.
///
/// A plain GET form that never submits a page number, so changing the
/// filters always lands back on the first page.
fn filter_form(customer_id: &str, query: &LedgerPageQuery) -> Markup {
    let action = format_endpoint(endpoints::CUSTOMER_ENTRIES_VIEW, customer_id);
    let kind = query.kind.unwrap_or_default();
    let kind_options = [
        (KindFilter::All, "All"),
        (KindFilter::Income, "Income"),
        (KindFilter::Expense, "Expense"),
    ];

    html! {
        form method="get" action=(action) class="w-full flex flex-wrap items-end gap-4 mb-4"
        {
            div
            {
                label for="date_from" class=(FORM_LABEL_STYLE) { "From" }

                input
                    type="date"
                    name="date_from"
                    id="date_from"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=(query.date_from.as_deref().unwrap_or(""));
            }

            div
            {
                label for="date_to" class=(FORM_LABEL_STYLE) { "To" }

                input
                    type="date"
                    name="date_to"
                    id="date_to"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=(query.date_to.as_deref().unwrap_or(""));
            }

            div
            {
                label for="kind" class=(FORM_LABEL_STYLE) { "Kind" }

                select name="kind" id="kind" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for (option, label) in kind_options {
                        option value=(option.as_str()) selected[option == kind] { (label) }
                    }
                }
            }

            button type="submit" class=(format!("{BUTTON_SECONDARY_STYLE} w-auto")) { "Apply" }
        }
    }
}

fn totals_view(view: &LedgerView) -> Markup {
    let net_class = if view.totals.net < 0.0 {
        "text-red-600 dark:text-red-400"
    } else {
        "text-green-600 dark:text-green-400"
    };

    html! {
        div class="w-full flex flex-wrap gap-6 mb-4 text-sm"
        {
            span { "Income: " strong { (format_currency(view.totals.income)) } }
            span { "Expenses: " strong { (format_currency(view.totals.expense)) } }
            span class=(net_class) { "Net: " strong { (format_currency(view.totals.net)) } }
        }
    }
}

fn entry_row(entry: &Entry) -> Markup {
    let (amount_class, sign) = match entry.kind {
        EntryKind::Income => ("text-green-600 dark:text-green-400", "+"),
        EntryKind::Expense => ("text-red-600 dark:text-red-400", "-"),
    };

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (format_entry_date(entry.occurred_at)) }
            td class=(TABLE_CELL_STYLE) { (entry.description) }
            td class=(TABLE_CELL_STYLE) { (entry.kind.as_str()) }
            td class=(format!("{TABLE_CELL_STYLE} text-right {amount_class}"))
            {
                (sign) (format_currency(entry.amount))
            }
        }
    }
}

fn page_url(customer_id: &str, query: &LedgerPageQuery, page: u64) -> String {
    let target = LedgerPageQuery {
        page: Some(page),
        ..query.clone()
    };
    let path = format_endpoint(endpoints::CUSTOMER_ENTRIES_VIEW, customer_id);

    match serde_urlencoded::to_string(&target) {
        Ok(query_string) => format!("{path}?{query_string}"),
        Err(_) => path,
    }
}

fn pagination_view(
    customer_id: &str,
    view: &LedgerView,
    query: &LedgerPageQuery,
    max_pages: u64,
) -> Markup {
    if view.page.page_count <= 1 {
        return html! {};
    }

    let indicators =
        create_pagination_indicators(view.page.page, view.page.page_count, max_pages);

    html! {
        nav class="flex gap-2 mt-4 text-sm" aria-label="Ledger pages"
        {
            @for indicator in indicators {
                @match indicator {
                    PaginationIndicator::CurrPage(page) => {
                        span class="font-bold px-2" aria-current="page" { (page) }
                    }
                    PaginationIndicator::Page(page) => {
                        a href=(page_url(customer_id, query, page)) class=(format!("{LINK_STYLE} px-2")) { (page) }
                    }
                    PaginationIndicator::Ellipsis => {
                        span class="px-2" { "…" }
                    }
                    PaginationIndicator::BackButton(page) => {
                        a href=(page_url(customer_id, query, page)) class=(LINK_STYLE) { "Previous" }
                    }
                    PaginationIndicator::NextButton(page) => {
                        a href=(page_url(customer_id, query, page)) class=(LINK_STYLE) { "Next" }
                    }
                }
            }
        }
    }
}

/// The totals, table and page links that fill `#ledger-section`.
pub(super) fn ledger_section_view(
    customer_id: &str,
    view: &LedgerView,
    query: &LedgerPageQuery,
    max_pages: u64,
) -> Markup {
    html! {
        (totals_view(view))

        @if view.page.items.is_empty() {
            p class="text-gray-600 dark:text-gray-400 py-8 text-center"
            {
                "No entries match the current filters."
            }
        } @else {
            div class="w-full overflow-x-auto shadow-md rounded"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Kind" }
                            th scope="col" class=(format!("{TABLE_CELL_STYLE} text-right")) { "Amount" }
                        }
                    }

                    tbody
                    {
                        @for entry in &view.page.items {
                            (entry_row(entry))
                        }
                    }
                }
            }

            (pagination_view(customer_id, view, query, max_pages))
        }
    }
}

/// The locked state of the entry panel: a password prompt that must succeed
/// before the add-entry form appears.
pub(super) fn verify_form(customer_id: &str) -> Markup {
    let action = format_endpoint(endpoints::VERIFY_CUSTOMER_API, customer_id);

    html! {
        form
            hx-post=(action)
            hx-target="#entry-panel"
            hx-target-error="#alert-container"
            hx-disabled-elt="#verify-password, #verify-button"
            class="flex flex-col gap-4"
        {
            h2 class="text-lg font-semibold" { "Add an entry" }

            div
            {
                label for="verify-password" class=(FORM_LABEL_STYLE) { "Customer password" }

                input
                    type="password"
                    name="password"
                    id="verify-password"
                    placeholder="••••••••"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;
            }

            button type="submit" id="verify-button" class=(BUTTON_SECONDARY_STYLE) { "Verify" }
        }
    }
}
