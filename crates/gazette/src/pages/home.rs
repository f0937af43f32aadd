use maud::{Markup, html};

use super::{ARTICLES_URL, PageContext, category_url, components::card_grid, layout};
use crate::{
    blog::{Blog, Category},
    query::{BlogFilter, group_by_category},
};

/// Landing page: hero, categories with their article counts, and the latest articles.
pub fn home_page(ctx: &PageContext, blogs: &[Blog]) -> Markup {
    let counts = group_by_category(blogs);
    let mut latest = BlogFilter::default().apply(blogs);
    latest.truncate(ctx.options.latest_count);

    layout(
        ctx,
        "Home",
        html! {
            section.hero {
                h1 { "Stay informed" }
                p { "The latest stories on politics, the world, the economy, science, health and society." }
                a href=(ARTICLES_URL) { "Browse all articles" }
            }
            section {
                h2 { "Categories" }
                div.category-grid {
                    @for category in Category::ALL {
                        a.category-tile href=(category_url(category)) {
                            strong { (category.label()) }
                            span.meta { (article_count(counts.get(&category).map_or(0, Vec::len))) }
                        }
                    }
                }
            }
            section {
                h2 { "Latest articles" }
                (card_grid(ctx, &latest))
                @if blogs.len() > latest.len() {
                    p { a href=(ARTICLES_URL) { "All articles (" (blogs.len()) ") →" } }
                }
            }
        },
    )
}

pub(super) fn article_count(count: usize) -> String {
    match count {
        1 => "1 article".to_string(),
        n => format!("{} articles", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GazetteOptions, api::tests::sample_blogs};

    #[test]
    fn test_home_lists_latest_first() {
        let options = GazetteOptions {
            latest_count: 2,
            ..Default::default()
        };
        let ctx = PageContext::static_export(&options);

        let page = home_page(&ctx, &sample_blogs()).into_string();

        let summit = page.find("Summit ends").unwrap();
        let markets = page.find("Markets rally").unwrap();
        assert!(summit < markets);
        assert!(!page.contains("Comet visible"));
        assert!(page.contains("All articles (4)"));
    }

    #[test]
    fn test_home_category_counts() {
        let options = GazetteOptions::default();
        let ctx = PageContext::static_export(&options);

        let page = home_page(&ctx, &sample_blogs()).into_string();

        assert!(page.contains("2 articles"));
        assert!(page.contains("1 article<"));
        assert!(page.contains("0 articles"));
    }

    #[test]
    fn test_article_count() {
        assert_eq!(article_count(0), "0 articles");
        assert_eq!(article_count(1), "1 article");
        assert_eq!(article_count(12), "12 articles");
    }
}
