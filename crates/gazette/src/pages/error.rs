use maud::{Markup, html};

use super::{ARTICLES_URL, PageContext, layout};

/// Error panel showing `message`, with a link retrying the failed page and a link home.
///
/// On the server `retry_url` should force a refresh (`?refresh=1`), otherwise the cached state would be shown again.
pub fn error_page(ctx: &PageContext, message: &str, retry_url: &str) -> Markup {
    layout(
        ctx,
        "Error",
        html! {
            div.panel.error role="alert" {
                h1 { "Something went wrong" }
                p { (message) }
                p {
                    a href=(retry_url) { "Try Again" }
                    " · "
                    a href="/" { "Go home" }
                }
            }
        },
    )
}

pub fn not_found_page(ctx: &PageContext) -> Markup {
    layout(
        ctx,
        "Not found",
        html! {
            div.panel {
                h1 { "Page not found" }
                p { "The article or page you are looking for does not exist." }
                p {
                    a href=(ARTICLES_URL) { "Browse articles" }
                    " · "
                    a href="/" { "Go home" }
                }
            }
        },
    )
}
