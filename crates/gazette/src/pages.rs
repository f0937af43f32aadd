//! HTML pages of the reader, written with [Maud](https://maud.lambda.xyz).
//!
//! Every page is a plain function from data to [`Markup`](maud::Markup). The same functions back the server and the static export,
//! [`RenderMode`] decides which interactive bits (search, favorites, reload links) are included.
use crate::{GazetteOptions, blog::Category, favorites::Favorites};

mod article;
mod components;
mod error;
mod home;
mod layout;
mod listing;

pub use article::article_page;
pub use components::{blog_card, pagination_nav};
pub use error::{error_page, not_found_page};
pub use home::home_page;
pub use layout::layout;
pub use listing::{article_list_page, category_page, favorites_page, search_page};

/// Stylesheet served at [`STYLESHEET_PATH`] and copied into static exports.
pub const STYLESHEET: &str = include_str!("pages/style.css");
pub const STYLESHEET_PATH: &str = "/style.css";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Rendered per request: search, favorites and reload links are available.
    Server,
    /// Rendered once into files: only plain links.
    Static,
}

/// Everything a page needs besides its own data.
pub struct PageContext<'a> {
    pub options: &'a GazetteOptions,
    pub mode: RenderMode,
    pub favorites: Option<&'a Favorites>,
}

impl<'a> PageContext<'a> {
    pub fn server(options: &'a GazetteOptions, favorites: &'a Favorites) -> Self {
        Self {
            options,
            mode: RenderMode::Server,
            favorites: Some(favorites),
        }
    }

    pub fn static_export(options: &'a GazetteOptions) -> Self {
        Self {
            options,
            mode: RenderMode::Static,
            favorites: None,
        }
    }

    pub fn is_server(&self) -> bool {
        self.mode == RenderMode::Server
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.is_some_and(|favorites| favorites.contains(id))
    }
}

pub fn blog_url(id: &str) -> String {
    format!("/blog/{}", urlencoding::encode(id))
}

pub fn category_url(category: Category) -> String {
    format!("/category/{}", category.slug())
}

pub const ARTICLES_URL: &str = "/articles";
pub const SEARCH_URL: &str = "/search";
pub const FAVORITES_URL: &str = "/favorites";

pub fn favorite_toggle_url(id: &str) -> String {
    format!("{}/{}", FAVORITES_URL, urlencoding::encode(id))
}

/// URL of page `page` of the listing living at `base`.
///
/// Page 1 is always `base` itself. Other pages are a `page` query parameter on the server and a `page/N` directory in
/// static exports.
pub fn listing_page_url(mode: RenderMode, base: &str, page: usize) -> String {
    if page <= 1 {
        return base.to_string();
    }

    match mode {
        RenderMode::Server => {
            let separator = if base.contains('?') { '&' } else { '?' };
            format!("{}{}page={}", base, separator, page)
        }
        RenderMode::Static => format!("{}/page/{}", base.trim_end_matches('/'), page),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        assert_eq!(blog_url("42"), "/blog/42");
        assert_eq!(blog_url("a b"), "/blog/a%20b");
        assert_eq!(category_url(Category::Top), "/category/top");
        assert_eq!(favorite_toggle_url("7"), "/favorites/7");
    }

    #[test]
    fn test_listing_page_url() {
        assert_eq!(listing_page_url(RenderMode::Server, "/articles", 1), "/articles");
        assert_eq!(listing_page_url(RenderMode::Server, "/articles", 3), "/articles?page=3");
        assert_eq!(
            listing_page_url(RenderMode::Server, "/search?q=rust", 2),
            "/search?q=rust&page=2"
        );
        assert_eq!(
            listing_page_url(RenderMode::Static, "/category/world", 2),
            "/category/world/page/2"
        );
    }

    #[test]
    fn test_context_favorites() {
        let options = GazetteOptions::default();
        let favorites = Favorites::from_ids(["3"]);

        let server = PageContext::server(&options, &favorites);
        assert!(server.is_server());
        assert!(server.is_favorite("3"));
        assert!(!server.is_favorite("4"));

        let exported = PageContext::static_export(&options);
        assert!(!exported.is_server());
        assert!(!exported.is_favorite("3"));
    }
}
