//! String helpers used to derive titles, excerpts and reading times from markdown content.
//!
//! All lengths are counted in characters, never in bytes, so that truncation never splits a code point.
use pulldown_cmark::{Event, Parser, TagEnd};

/// Words per minute used to estimate reading time.
pub const READING_TIME_WPM: usize = 200;

const ELLIPSIS: &str = "...";

/// Cuts `text` to `max_length` characters, appending an ellipsis when something was removed.
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() > max_length {
        format!("{}{}", take_chars(text, max_length), ELLIPSIS)
    } else {
        text.to_string()
    }
}

pub fn slugify(text: &str) -> String {
    slug::slugify(text)
}

/// Upper-cases the first letter of every word, leaving the rest untouched.
pub fn capitalize_words(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_is_word = false;

    for c in text.chars() {
        let is_word = c.is_alphanumeric() || c == '_';
        if is_word && !previous_is_word {
            result.extend(c.to_uppercase());
        } else {
            result.push(c);
        }
        previous_is_word = is_word;
    }

    result
}

/// Returns the readable text of a markdown document, on a single line.
///
/// Headings, emphasis, links and inline code keep their text, everything else (markers, URLs, images) is dropped.
pub fn remove_markdown(text: &str) -> String {
    let mut plain = String::new();

    for event in Parser::new(text) {
        match event {
            Event::Text(text) | Event::Code(text) => plain.push_str(&text),
            Event::SoftBreak | Event::HardBreak => plain.push(' '),
            Event::End(
                TagEnd::Paragraph
                | TagEnd::Heading(_)
                | TagEnd::Item
                | TagEnd::CodeBlock
                | TagEnd::TableCell
                | TagEnd::BlockQuote(_),
            ) => plain.push(' '),
            _ => (),
        }
    }

    plain.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Finds a title for markdown content: the first level 1 or 2 heading, otherwise the first line.
pub fn extract_title(markdown: &str) -> String {
    for line in markdown.lines() {
        let line = line.trim();
        if let Some(title) = line.strip_prefix("# ") {
            return title.trim().to_string();
        }
        if let Some(title) = line.strip_prefix("## ") {
            return title.trim().to_string();
        }
    }

    match markdown.lines().next().map(str::trim) {
        Some(first_line) if !first_line.is_empty() => first_line.to_string(),
        _ => "Untitled".to_string(),
    }
}

/// Plain-text preview of markdown content, at most `max_length` characters plus an ellipsis.
pub fn extract_excerpt(markdown: &str, max_length: usize) -> String {
    let plain = remove_markdown(markdown);

    if plain.chars().count() <= max_length {
        return plain;
    }

    format!("{}{}", take_chars(&plain, max_length).trim_end(), ELLIPSIS)
}

/// Estimated minutes needed to read `text`, rounded up.
pub fn calculate_reading_time(text: &str) -> u32 {
    let words = text.split_whitespace().count();
    words.div_ceil(READING_TIME_WPM) as u32
}

pub fn format_reading_time(minutes: u32) -> String {
    match minutes {
        0 => "< 1 min read".to_string(),
        1 => "1 min read".to_string(),
        minutes => format!("{} min read", minutes),
    }
}

fn take_chars(text: &str, count: usize) -> &str {
    match text.char_indices().nth(count) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("exactly ten", 11), "exactly ten");
        assert_eq!(truncate_text("a longer sentence", 8), "a longer...");
        assert_eq!(truncate_text("", 5), "");
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate_text("éééé", 2), "éé...");
    }

    #[test]
    fn test_capitalize_words() {
        assert_eq!(capitalize_words("hello world"), "Hello World");
        assert_eq!(capitalize_words("top-stories today"), "Top-Stories Today");
        assert_eq!(capitalize_words(""), "");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust   is  fun "), "rust-is-fun");
    }

    #[test]
    fn test_remove_markdown() {
        let markdown = "# Title\n\nSome **bold** and *italic* with a [link](https://example.com) and `code`.\n\n> quoted";
        assert_eq!(
            remove_markdown(markdown),
            "Title Some bold and italic with a link and code. quoted"
        );
    }

    #[test]
    fn test_extract_title() {
        assert_eq!(extract_title("# Main title\n\nBody"), "Main title");
        assert_eq!(extract_title("intro\n## Second level\n"), "Second level");
        assert_eq!(extract_title("  first line  \nsecond"), "first line");
        assert_eq!(extract_title(""), "Untitled");
        assert_eq!(extract_title("\n\nbody"), "Untitled");
    }

    #[test]
    fn test_extract_excerpt() {
        let markdown = "# Title\n\nThe quick brown fox jumps over the lazy dog.";
        assert_eq!(
            extract_excerpt(markdown, 150),
            "Title The quick brown fox jumps over the lazy dog."
        );
        assert_eq!(extract_excerpt(markdown, 10), "Title The...");
        assert_eq!(extract_excerpt("", 10), "");
    }

    #[test]
    fn test_reading_time() {
        assert_eq!(calculate_reading_time(""), 0);
        assert_eq!(calculate_reading_time("one two three"), 1);

        let long_text = vec!["word"; 401].join(" ");
        assert_eq!(calculate_reading_time(&long_text), 3);

        assert_eq!(format_reading_time(0), "< 1 min read");
        assert_eq!(format_reading_time(1), "1 min read");
        assert_eq!(format_reading_time(7), "7 min read");
    }
}
