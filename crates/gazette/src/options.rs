use std::{env, path::PathBuf, time::Duration};

use crate::{api::DEFAULT_API_BASE_URL, query::DEFAULT_ITEMS_PER_PAGE, sitemap::SitemapOptions};

/// Environment variable overriding [`GazetteOptions::api_base_url`]'s default.
pub const API_URL_ENV: &str = "GAZETTE_API_URL";

/// Gazette options, shared by the server and the static export.
///
/// ## Examples
/// Default values:
/// ```
/// use gazette::GazetteOptions;
///
/// let options = GazetteOptions::default();
/// assert_eq!(options.items_per_page, 10);
/// ```
/// Custom values:
/// ```
/// use gazette::GazetteOptions;
/// use gazette::sitemap::SitemapOptions;
///
/// let options = GazetteOptions {
///     api_base_url: "https://news.example.com/api/blogs/v1".into(),
///     base_url: Some("https://news.example.com".into()),
///     output_dir: "public".into(),
///     sitemap: SitemapOptions {
///         enabled: true,
///         ..Default::default()
///     },
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct GazetteOptions {
    /// Base URL of the blog API, without trailing slash. Defaults to `$GAZETTE_API_URL`, or to
    /// [`DEFAULT_API_BASE_URL`] when the variable is unset.
    pub api_base_url: String,

    pub request_timeout: Duration,

    pub items_per_page: usize,

    /// How many articles the home page lists.
    pub latest_count: usize,

    /// Length, in characters, of the excerpts shown on article cards.
    pub excerpt_length: usize,

    /// Public URL of the site, e.g. `https://example.com`. Needed for share links and sitemaps.
    pub base_url: Option<String>,

    pub output_dir: PathBuf,

    /// Whether to empty the output directory before a static export.
    pub clean_output_dir: bool,

    pub sitemap: SitemapOptions,
}

impl Default for GazetteOptions {
    fn default() -> Self {
        Self {
            api_base_url: env::var(API_URL_ENV)
                .ok()
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            request_timeout: Duration::from_secs(10),
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            latest_count: 6,
            excerpt_length: 120,
            base_url: None,
            output_dir: "dist".into(),
            clean_output_dir: true,
            sitemap: SitemapOptions::default(),
        }
    }
}

impl GazetteOptions {
    /// Absolute URL for `path` when a base URL is configured, `path` itself otherwise.
    pub fn absolute_url(&self, path: &str) -> String {
        match &self.base_url {
            Some(base_url) => format!("{}{}", base_url.trim_end_matches('/'), path),
            None => path.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_url() {
        let mut options = GazetteOptions::default();
        assert_eq!(options.absolute_url("/blog/1"), "/blog/1");

        options.base_url = Some("https://example.com/".into());
        assert_eq!(options.absolute_url("/blog/1"), "https://example.com/blog/1");
    }
}
