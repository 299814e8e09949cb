//! Alert toasts for displaying success and error messages to users.
//!
//! Alerts render into the `#alert-container` element that [crate::html::base]
//! places on every page. Error responses reach it via the response-targets
//! extension (`hx-target-error`); success toasts piggyback on fragment swaps
//! as out-of-band content.

use maud::{Markup, html};

/// A transient message shown at the bottom of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    SuccessSimple { message: String },
    Error { message: String, details: String },
    ErrorSimple { message: String },
}

impl Alert {
    fn parts(&self) -> (&'static str, &str, &str) {
        match self {
            Alert::SuccessSimple { message } => (SUCCESS_STYLE, message, ""),
            Alert::Error { message, details } => (ERROR_STYLE, message, details),
            Alert::ErrorSimple { message } => (ERROR_STYLE, message, ""),
        }
    }

    /// Render the alert for responses targeted at `#alert-container`.
    pub fn into_html(self) -> Markup {
        let (style, message, details) = self.parts();

        // Template adapted from https://flowbite.com/docs/components/alerts/
        html! {
            div class=(style) role="alert"
            {
                div
                {
                    p class="font-medium" { (message) }

                    @if !details.is_empty()
                    {
                        p class="text-sm" { (details) }
                    }
                }

                button
                    type="button"
                    class="ms-auto -mx-1.5 -my-1.5 rounded-lg p-1.5 inline-flex items-center justify-center h-8 w-8"
                    aria-label="Close"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "✕"
                }
            }
        }
    }

    /// Render the alert as an out-of-band swap, for attaching a toast to a
    /// response whose main content replaces some other element.
    pub fn into_oob_html(self) -> Markup {
        html! {
            div id="alert-container" hx-swap-oob="innerHTML"
            {
                (self.into_html())
            }
        }
    }
}

const SUCCESS_STYLE: &str = "flex items-center gap-3 p-4 mb-4 rounded-lg \
    text-green-800 bg-green-50 dark:bg-gray-800 dark:text-green-400 shadow";

const ERROR_STYLE: &str = "flex items-center gap-3 p-4 mb-4 rounded-lg \
    text-red-800 bg-red-50 dark:bg-gray-800 dark:text-red-400 shadow";
