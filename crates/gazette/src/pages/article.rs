use maud::{Markup, PreEscaped, html};

use super::{ARTICLES_URL, PageContext, blog_url, components::category_badge, favorite_toggle_url, layout};
use crate::{
    blog::Blog,
    dates::{format_date, format_date_time},
    markdown::{MarkdownHeading, headings, render_markdown},
    share::SharePlatform,
    text::format_reading_time,
};

/// A full article: header, table of contents, rendered body, sharing and favorites.
pub fn article_page(ctx: &PageContext, blog: &Blog) -> Markup {
    let title = blog.display_title();
    let excerpt = blog.summary(ctx.options.excerpt_length);
    let toc = headings(&blog.content);
    let url = ctx.options.absolute_url(&blog_url(&blog.id));

    layout(
        ctx,
        &title,
        html! {
            article.article {
                header {
                    div.article-meta {
                        (category_badge(blog.category))
                        time datetime=(blog.publish_date) { (format_date(&blog.publish_date)) }
                        span { (format_reading_time(blog.reading_time())) }
                    }
                    h1 { (title) }
                    @if !excerpt.is_empty() {
                        p.excerpt { (excerpt) }
                    }
                }
                @if toc.len() >= 2 {
                    (table_of_contents(&toc))
                }
                div.article-body {
                    (PreEscaped(render_markdown(&blog.content)))
                }
                footer.article-footer {
                    p.meta {
                        "Published " (format_date_time(&blog.publish_date))
                        @if let Some(updated) = blog.updated_date.as_deref().filter(|_| blog.was_updated()) {
                            br;
                            "Updated " (format_date_time(updated))
                        }
                    }
                    div.share-links {
                        span { "Share:" }
                        @for platform in SharePlatform::ALL {
                            a href=(platform.share_url(&url, &title, &excerpt)) target="_blank" rel="noopener noreferrer" {
                                (platform.label())
                            }
                        }
                    }
                    @if ctx.is_server() {
                        form method="post" action=(favorite_toggle_url(&blog.id)) {
                            button type="submit" {
                                @if ctx.is_favorite(&blog.id) { "★ Remove from favorites" } @else { "☆ Add to favorites" }
                            }
                        }
                    }
                    p { a href=(ARTICLES_URL) { "← Back to articles" } }
                }
            }
        },
    )
}

fn table_of_contents(headings: &[MarkdownHeading]) -> Markup {
    html! {
        nav.toc aria-label="Table of contents" {
            h2 { "Contents" }
            ul {
                @for heading in headings {
                    li class=(format!("toc-level-{}", heading.level)) {
                        a href=(format!("#{}", heading.id)) { (heading.title) }
                    }
                }
            }
        }
    }
}
