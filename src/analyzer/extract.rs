//! SEO field extraction from fetched HTML.

use scraper::{ElementRef, Html, Selector};

/// Column width for `h1` and `title`.
pub const MAX_TAG_CHARS: usize = 255;

/// Fields pulled out of a page. Absent or blank values are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeoTags {
    pub h1: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Extract the first `<h1>`, the first `<title>` and the meta description.
///
/// Malformed markup is parsed leniently; this never fails.
pub fn extract(html: &str) -> SeoTags {
    let document = Html::parse_document(html);

    SeoTags {
        h1: first_text(&document, "h1").map(|s| truncate_chars(s, MAX_TAG_CHARS)),
        title: first_text(&document, "title").map(|s| truncate_chars(s, MAX_TAG_CHARS)),
        description: meta_description(&document),
    }
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn first_text(document: &Html, css: &str) -> Option<String> {
    let selector = selector(css)?;
    let element = document.select(&selector).next()?;
    non_blank(&element_text(element))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

fn meta_description(document: &Html) -> Option<String> {
    let selector = selector("meta[name]")?;
    let meta = document.select(&selector).find(|el| {
        el.value()
            .attr("name")
            .is_some_and(|name| name.trim().eq_ignore_ascii_case("description"))
    })?;
    non_blank(meta.value().attr("content")?)
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Cut `s` to at most `max` characters, on a char boundary.
pub fn truncate_chars(s: String, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s,
    }
}
