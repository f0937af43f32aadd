use maud::{Markup, html};

use super::{PageContext, blog_url, category_url};
use crate::{
    blog::{Blog, Category},
    dates::format_date_short,
    query::Pagination,
};

pub fn category_badge(category: Category) -> Markup {
    html! {
        a class=(format!("badge badge-{}", category.slug())) href=(category_url(category)) {
            (category.label())
        }
    }
}

/// Summary of an article: category, title, excerpt and publish date.
pub fn blog_card(ctx: &PageContext, blog: &Blog) -> Markup {
    let url = blog_url(&blog.id);

    html! {
        article.card {
            div { (category_badge(blog.category)) }
            h3 {
                a href=(url) { (blog.display_title()) }
            }
            p.excerpt { (blog.summary(ctx.options.excerpt_length)) }
            div.meta {
                time datetime=(blog.publish_date) { (format_date_short(&blog.publish_date)) }
                @if ctx.is_favorite(&blog.id) {
                    span.favorite title="In your favorites" { "★" }
                }
                a href=(url) { "Read More →" }
            }
        }
    }
}

/// A grid of cards, or an empty state when there is nothing to show.
pub fn card_grid(ctx: &PageContext, blogs: &[Blog]) -> Markup {
    html! {
        @if blogs.is_empty() {
            p.empty { "No articles found." }
        } @else {
            div.card-grid {
                @for blog in blogs {
                    (blog_card(ctx, blog))
                }
            }
        }
    }
}

/// Previous/next links and page numbers. Renders nothing when everything fits on one page.
pub fn pagination_nav(pagination: &Pagination, page_url: impl Fn(usize) -> String) -> Markup {
    if pagination.total_pages() <= 1 {
        return html! {};
    }

    let current = pagination.current_page();

    html! {
        nav.pagination aria-label="Pagination" {
            @if pagination.has_prev() {
                a rel="prev" href=(page_url(current - 1)) { "← Previous" }
            }
            @for page in 1..=pagination.total_pages() {
                @if page == current {
                    span.current aria-current="page" { (page) }
                } @else {
                    a href=(page_url(page)) { (page) }
                }
            }
            @if pagination.has_next() {
                a rel="next" href=(page_url(current + 1)) { "Next →" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GazetteOptions, api::tests::sample_blogs, favorites::Favorites};

    #[test]
    fn test_blog_card() {
        let options = GazetteOptions::default();
        let favorites = Favorites::from_ids(["2"]);
        let ctx = PageContext::server(&options, &favorites);
        let blogs = sample_blogs();

        let card = blog_card(&ctx, &blogs[1]).into_string();
        assert!(card.contains("href=\"/blog/2\""));
        assert!(card.contains("Summit ends"));
        assert!(card.contains("badge badge-world"));
        assert!(card.contains("Feb 1, 2024"));
        assert!(card.contains("★"));

        let other = blog_card(&ctx, &blogs[0]).into_string();
        assert!(!other.contains("★"));
    }

    #[test]
    fn test_empty_grid() {
        let options = GazetteOptions::default();
        let ctx = PageContext::static_export(&options);

        assert!(card_grid(&ctx, &[]).into_string().contains("No articles found."));
    }

    #[test]
    fn test_pagination_nav() {
        let single = Pagination::new(5, 10);
        assert_eq!(pagination_nav(&single, |p| p.to_string()).into_string(), "");

        let middle = Pagination::at(25, 10, 2);
        let nav = pagination_nav(&middle, |p| format!("/articles?page={}", p)).into_string();
        assert!(nav.contains("href=\"/articles?page=1\""));
        assert!(nav.contains("<span class=\"current\" aria-current=\"page\">2</span>"));
        assert!(nav.contains("rel=\"next\" href=\"/articles?page=3\""));
    }
}
