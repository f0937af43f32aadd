use maud::{DOCTYPE, Markup, html};

use super::{FAVORITES_URL, PageContext, SEARCH_URL, STYLESHEET_PATH, category_url};
use crate::{GENERATOR, blog::Category};

/// Wraps page content with the document head, the site header and footer.
pub fn layout(ctx: &PageContext, title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                meta name="generator" content=(GENERATOR);
                title { (title) " | Gazette" }
                link rel="stylesheet" type="text/css" href=(STYLESHEET_PATH);
            }
            body {
                header.site-header {
                    div.container {
                        a.brand href="/" { "Gazette" }
                        nav.site-nav {
                            @for category in Category::ALL {
                                a href=(category_url(category)) { (category.label()) }
                            }
                            @if ctx.is_server() {
                                a href=(FAVORITES_URL) { "Favorites" }
                            }
                        }
                        @if ctx.is_server() {
                            form.search-form action=(SEARCH_URL) method="get" role="search" {
                                input type="search" name="q" placeholder="Search articles" aria-label="Search articles";
                            }
                        }
                    }
                }
                main {
                    div.container {
                        (content)
                    }
                }
                footer.site-footer {
                    div.container {
                        p { "Gazette. News from every corner, one page at a time." }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GazetteOptions, favorites::Favorites};

    #[test]
    fn test_server_layout_has_search_and_favorites() {
        let options = GazetteOptions::default();
        let favorites = Favorites::new();
        let ctx = PageContext::server(&options, &favorites);

        let page = layout(&ctx, "Home", html! { p { "hello" } }).into_string();

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Home | Gazette</title>"));
        assert!(page.contains("action=\"/search\""));
        assert!(page.contains("href=\"/favorites\""));
        assert!(page.contains("href=\"/category/polity\""));
        assert!(page.contains("<p>hello</p>"));
    }

    #[test]
    fn test_static_layout_has_plain_links_only() {
        let options = GazetteOptions::default();
        let ctx = PageContext::static_export(&options);

        let page = layout(&ctx, "Home", html! {}).into_string();

        assert!(!page.contains("action=\"/search\""));
        assert!(!page.contains("href=\"/favorites\""));
        assert!(page.contains("Top Stories"));
    }
}
