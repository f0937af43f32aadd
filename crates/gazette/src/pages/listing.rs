use maud::{Markup, html};

use super::{
    ARTICLES_URL, PageContext, SEARCH_URL, category_url,
    components::{card_grid, pagination_nav},
    home::article_count,
    layout, listing_page_url,
};
use crate::{
    blog::{Blog, Category},
    query::{BlogFilter, Pagination, SortKey, SortOrder},
};

/// Every article, filtered and sorted by `filter`, one page at a time.
pub fn article_list_page(ctx: &PageContext, blogs: &[Blog], filter: &BlogFilter, page: usize) -> Markup {
    let filtered = filter.apply(blogs);
    let base = articles_base_url(filter);

    layout(
        ctx,
        "All articles",
        html! {
            h1 { "All articles" }
            p.meta { (article_count(filtered.len())) }
            @if ctx.is_server() {
                (filter_form(filter))
            }
            (paginated_cards(ctx, &filtered, &base, page))
        },
    )
}

pub fn category_page(ctx: &PageContext, category: Category, blogs: &[Blog], page: usize) -> Markup {
    let sorted = BlogFilter::default().apply(blogs);

    layout(
        ctx,
        category.label(),
        html! {
            h1 { (category.label()) }
            p.meta { (article_count(sorted.len())) }
            (paginated_cards(ctx, &sorted, &category_url(category), page))
        },
    )
}

/// Results for `term`. A blank term shows the search form alone.
pub fn search_page(ctx: &PageContext, term: &str, results: &[Blog], page: usize) -> Markup {
    let term = term.trim();
    let base = format!("{}?q={}", SEARCH_URL, urlencoding::encode(term));

    layout(
        ctx,
        "Search",
        html! {
            h1 { "Search" }
            form.search-form action=(SEARCH_URL) method="get" role="search" {
                input type="search" name="q" value=(term) placeholder="Search articles" aria-label="Search articles";
                button type="submit" { "Search" }
            }
            @if !term.is_empty() {
                p.meta {
                    (match results.len() {
                        1 => "1 result".to_string(),
                        n => format!("{} results", n),
                    })
                    " for “" (term) "”"
                }
                (paginated_cards(ctx, results, &base, page))
            }
        },
    )
}

/// Favorite articles still present in `blogs`, in the order they were added.
pub fn favorites_page(ctx: &PageContext, blogs: &[Blog]) -> Markup {
    let favorites: Vec<Blog> = ctx
        .favorites
        .map(|favorites| {
            favorites
                .ids()
                .iter()
                .filter_map(|id| blogs.iter().find(|blog| &blog.id == id))
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    layout(
        ctx,
        "Favorites",
        html! {
            h1 { "Favorites" }
            @if favorites.is_empty() {
                p.empty { "You have no favorite articles yet." }
                p { a href=(ARTICLES_URL) { "Browse articles" } }
            } @else {
                p.meta { (article_count(favorites.len())) }
                (card_grid(ctx, &favorites))
            }
        },
    )
}

fn paginated_cards(ctx: &PageContext, blogs: &[Blog], base: &str, page: usize) -> Markup {
    let pagination = Pagination::at(blogs.len(), ctx.options.items_per_page, page);

    html! {
        (card_grid(ctx, pagination.slice(blogs)))
        (pagination_nav(&pagination, |p| listing_page_url(ctx.mode, base, p)))
    }
}

/// `/articles` with the non-default filter parameters, so that pagination keeps them.
fn articles_base_url(filter: &BlogFilter) -> String {
    let defaults = BlogFilter::default();
    let mut params = vec![];

    if let Some(category) = filter.category {
        params.push(format!("category={}", category.slug()));
    }
    if filter.sort_by != defaults.sort_by {
        params.push(format!("sort={}", filter.sort_by.as_str()));
    }
    if filter.order != defaults.order {
        params.push(format!("order={}", filter.order.as_str()));
    }

    if params.is_empty() {
        ARTICLES_URL.to_string()
    } else {
        format!("{}?{}", ARTICLES_URL, params.join("&"))
    }
}

fn filter_form(filter: &BlogFilter) -> Markup {
    let sort_keys = [
        (SortKey::PublishDate, "Publish date"),
        (SortKey::UpdatedDate, "Last updated"),
        (SortKey::Title, "Title"),
        (SortKey::Category, "Category"),
    ];

    html! {
        form.filters action=(ARTICLES_URL) method="get" {
            select name="category" aria-label="Category" {
                option value="" selected[filter.category.is_none()] { "All categories" }
                @for category in Category::ALL {
                    option value=(category.slug()) selected[filter.category == Some(category)] { (category.label()) }
                }
            }
            select name="sort" aria-label="Sort by" {
                @for (key, label) in sort_keys {
                    option value=(key.as_str()) selected[filter.sort_by == key] { (label) }
                }
            }
            select name="order" aria-label="Order" {
                option value=(SortOrder::Desc.as_str()) selected[filter.order == SortOrder::Desc] { "Descending" }
                option value=(SortOrder::Asc.as_str()) selected[filter.order == SortOrder::Asc] { "Ascending" }
            }
            button type="submit" { "Apply" }
            a href=(ARTICLES_URL) { "Reset" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        GazetteOptions,
        api::tests::{blog, sample_blogs},
        favorites::Favorites,
    };

    #[test]
    fn test_article_list_paginates() {
        let options = GazetteOptions {
            items_per_page: 2,
            ..Default::default()
        };
        let ctx = PageContext::static_export(&options);
        let blogs = sample_blogs();

        let first = article_list_page(&ctx, &blogs, &BlogFilter::default(), 1).into_string();
        assert!(first.contains("Summit ends"));
        assert!(first.contains("Markets rally"));
        assert!(!first.contains("Comet visible"));
        assert!(first.contains("href=\"/articles/page/2\""));

        let second = article_list_page(&ctx, &blogs, &BlogFilter::default(), 2).into_string();
        assert!(second.contains("Comet visible"));
        assert!(!second.contains("Summit ends"));
    }

    #[test]
    fn test_article_list_keeps_filter_in_page_links() {
        let options = GazetteOptions {
            items_per_page: 1,
            ..Default::default()
        };
        let favorites = Favorites::new();
        let ctx = PageContext::server(&options, &favorites);
        let filter = BlogFilter::from_params(Some("science"), Some("title"), Some("asc"));

        let page = article_list_page(&ctx, &sample_blogs(), &filter, 1).into_string();

        assert!(page.contains("2 articles"));
        assert!(page.contains("href=\"/articles?category=science&amp;sort=title&amp;order=asc&amp;page=2\""));
        assert!(page.contains("<option value=\"science\" selected>"));
    }

    #[test]
    fn test_empty_article_list() {
        let options = GazetteOptions::default();
        let ctx = PageContext::static_export(&options);

        let page = article_list_page(&ctx, &[], &BlogFilter::default(), 1).into_string();

        assert!(page.contains("No articles found."));
        assert!(!page.contains("class=\"pagination\""));
    }

    #[test]
    fn test_category_page() {
        let options = GazetteOptions::default();
        let ctx = PageContext::static_export(&options);
        let science: Vec<Blog> = sample_blogs()
            .into_iter()
            .filter(|blog| blog.category == Category::Science)
            .collect();

        let page = category_page(&ctx, Category::Science, &science, 1).into_string();

        assert!(page.contains("<h1>Science</h1>"));
        assert!(page.contains("2 articles"));
        assert!(page.find("Fusion breakthrough").unwrap() < page.find("Comet visible").unwrap());
    }

    #[test]
    fn test_search_page() {
        let options = GazetteOptions::default();
        let favorites = Favorites::new();
        let ctx = PageContext::server(&options, &favorites);
        let results = vec![blog("9", Category::Health, "2024-03-01", "# Sleep & you")];

        let page = search_page(&ctx, "  sleep ", &results, 1).into_string();
        assert!(page.contains("1 result for “sleep”"));
        assert!(page.contains("value=\"sleep\""));
        assert!(page.contains("Sleep &amp; you"));

        let blank = search_page(&ctx, "", &[], 1).into_string();
        assert!(!blank.contains("No articles found."));
    }

    #[test]
    fn test_favorites_page_keeps_added_order() {
        let options = GazetteOptions::default();
        let favorites = Favorites::from_ids(["4", "missing", "1"]);
        let ctx = PageContext::server(&options, &favorites);

        let page = favorites_page(&ctx, &sample_blogs()).into_string();

        assert!(page.contains("2 articles"));
        assert!(page.find("Markets rally").unwrap() < page.find("Fusion breakthrough").unwrap());

        let empty = Favorites::new();
        let ctx = PageContext::server(&options, &empty);
        assert!(favorites_page(&ctx, &sample_blogs()).into_string().contains("no favorite articles"));
    }
}
