//! Renders flash messages as dismissable alert boxes.

use maud::{Markup, html};

use crate::flash::{Flash, FlashLevel};

const ALERT_BASE_STYLE: &str = "flex items-center justify-between p-4 mb-4 text-sm rounded-lg";

fn level_style(level: FlashLevel) -> &'static str {
    match level {
        FlashLevel::Success => {
            "text-green-800 bg-green-50 dark:bg-gray-800 dark:text-green-400 border border-green-300"
        }
        FlashLevel::Error => {
            "text-red-800 bg-red-50 dark:bg-gray-800 dark:text-red-400 border border-red-300"
        }
        FlashLevel::Info => {
            "text-blue-800 bg-blue-50 dark:bg-gray-800 dark:text-blue-400 border border-blue-300"
        }
    }
}

/// Render `flash` as an alert box.
///
/// The alert has the role "alert" so it is announced by screen readers, and
/// a `data-level` attribute naming its level.
pub fn alert_view(flash: &Flash) -> Markup {
    let level = match flash.level {
        FlashLevel::Success => "success",
        FlashLevel::Error => "error",
        FlashLevel::Info => "info",
    };

    html! {
        div
            role="alert"
            data-level=(level)
            class={ (ALERT_BASE_STYLE) " " (level_style(flash.level)) }
        {
            span class="font-medium" { (flash.message) }

            button
                type="button"
                aria-label="Close"
                class="ms-3 font-bold"
                onclick="this.parentElement.remove()"
            {
                "×"
            }
        }
    }
}
