//! The landing page served at the root path.

use axum::response::{IntoResponse, Redirect, Response};
use maud::{Markup, html};

use crate::{
    auth::Identity,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base},
};

fn landing_view() -> Markup {
    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-xl space-y-6 text-center"
            {
                h1 class="text-4xl font-bold tracking-tight" { "Finance Tracker" }

                p class="text-lg text-gray-500 dark:text-gray-400"
                {
                    "Record your income and expenses and see how much you have saved."
                }

                div class="flex items-center justify-center gap-4"
                {
                    a href=(endpoints::LOG_IN_VIEW) class=(BUTTON_PRIMARY_STYLE) { "Log in" }
                    a href=(endpoints::REGISTER_VIEW) class=(LINK_STYLE) { "Create an account" }
                }
            }
        }
    };

    base("Welcome", &[], &content)
}

/// Send logged in users to their dashboard, everyone else gets the landing page.
pub async fn get_index_page(identity: Identity) -> Response {
    match identity {
        Identity::Authenticated(_) => Redirect::to(endpoints::DASHBOARD_VIEW).into_response(),
        Identity::Anonymous => landing_view().into_response(),
    }
}
