//! Markdown rendering for article bodies.
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd};

mod slugger;

use slugger::Slugger;

/// A heading of an article, usable to build a table of contents.
///
/// ## Example
/// ```
/// use gazette::markdown::headings;
///
/// let toc = headings("# Intro\n\n## Details\n\n## Details");
/// let ids: Vec<_> = toc.iter().map(|heading| heading.id.as_str()).collect();
/// assert_eq!(ids, ["intro", "details", "details-1"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownHeading {
    pub title: String,
    pub id: String,
    pub level: u8,
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Lists the headings of `content`, with the same ids [`render_markdown`] gives them.
pub fn headings(content: &str) -> Vec<MarkdownHeading> {
    let events: Vec<Event> = Parser::new_ext(content, parser_options()).collect();
    let mut slugger = Slugger::new();
    let mut headings = vec![];

    for (i, event) in events.iter().enumerate() {
        if let Event::Start(Tag::Heading { level, id, .. }) = event {
            let title = heading_text(&events, i);
            let slug = slugger.slugify(&title);
            headings.push(MarkdownHeading {
                id: id.as_ref().map(|id| id.to_string()).unwrap_or(slug),
                title,
                level: *level as u8,
            });
        }
    }

    headings
}

/// Renders markdown to HTML.
///
/// Headings get unique ids, links leaving the site open in a new tab, and tables are wrapped so they can scroll
/// horizontally. Raw HTML in `content` is escaped.
///
/// ## Example
/// ```
/// use gazette::markdown::render_markdown;
///
/// let html = render_markdown("# Hello, world!");
/// assert_eq!(html, "<h1 id=\"hello-world\">Hello, world!</h1>\n");
/// ```
pub fn render_markdown(content: &str) -> String {
    let events: Vec<Event> = Parser::new_ext(content, parser_options()).collect();
    let mut slugger = Slugger::new();
    let mut transformed = Vec::with_capacity(events.len());
    let mut external_links = vec![];

    for (i, event) in events.iter().enumerate() {
        match event {
            Event::Start(Tag::Heading {
                level, id, classes, ..
            }) => {
                let slug = slugger.slugify(&heading_text(&events, i));
                let heading_id: &str = match id {
                    Some(id) => id,
                    None => &slug,
                };
                let class_attr = if classes.is_empty() {
                    String::new()
                } else {
                    format!(
                        " class=\"{}\"",
                        classes
                            .iter()
                            .map(|c| escape_attr(c))
                            .collect::<Vec<_>>()
                            .join(" ")
                    )
                };

                transformed.push(Event::Html(CowStr::from(format!(
                    "<h{} id=\"{}\"{}>",
                    *level as u8,
                    escape_attr(heading_id),
                    class_attr
                ))));
            }
            Event::Start(Tag::Link {
                dest_url, title, ..
            }) if is_external(dest_url) => {
                external_links.push(true);
                let title_attr = if title.is_empty() {
                    String::new()
                } else {
                    format!(" title=\"{}\"", escape_attr(title))
                };

                transformed.push(Event::Html(CowStr::from(format!(
                    "<a href=\"{}\"{} target=\"_blank\" rel=\"noopener noreferrer\">",
                    escape_attr(dest_url),
                    title_attr
                ))));
            }
            Event::Start(Tag::Link { .. }) => {
                external_links.push(false);
                transformed.push(event.clone());
            }
            Event::End(TagEnd::Link) => {
                if external_links.pop().unwrap_or(false) {
                    transformed.push(Event::Html("</a>".into()));
                } else {
                    transformed.push(event.clone());
                }
            }
            Event::Start(Tag::Table(_)) => {
                transformed.push(Event::Html("<div class=\"table-wrapper\">".into()));
                transformed.push(event.clone());
            }
            Event::End(TagEnd::Table) => {
                transformed.push(event.clone());
                transformed.push(Event::Html("</div>\n".into()));
            }
            // Raw HTML from article bodies is shown as text, never interpreted
            Event::Html(html) | Event::InlineHtml(html) => transformed.push(Event::Text(html.clone())),
            _ => transformed.push(event.clone()),
        }
    }

    let mut html_output = String::new();
    pulldown_cmark::html::push_html(&mut html_output, transformed.into_iter());
    html_output
}

fn is_external(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn heading_text(events: &[Event], start: usize) -> String {
    let mut title = String::new();

    for event in events.iter().skip(start + 1) {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(text) | Event::Code(text) => title.push_str(text),
            _ => continue,
        }
    }

    title
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
