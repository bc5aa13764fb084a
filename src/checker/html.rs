// src/checker/html.rs
// =============================================================================
// Pulls SEO metadata out of an HTML page.
//
// We extract three fields:
// - the text of the first <title> element
// - the content of <meta name="description"> (attribute order does not matter)
// - the href of <link rel="canonical">
//
// The `scraper` crate parses with html5ever, so malformed markup, multi-line
// tags and attributes in any order are handled the way a browser would.
// Nothing here can fail: a missing field is just None.
//
// Rust concepts:
// - LazyLock: a static built on first use, shared by every thread after that
// - Option chaining with ?: any missing step ends the function with None
// - Iterators: select() yields matching elements lazily; find() stops early
// =============================================================================

use scraper::{Html, Selector};
use std::sync::LazyLock;

const TITLE_SELECTOR_STR: &str = "title";
const META_SELECTOR_STR: &str = "meta[name][content]";
const LINK_SELECTOR_STR: &str = "link[rel][href]";

// Selectors are compile-time constants; if one ever fails to parse we fall
// back to a selector that matches nothing instead of panicking mid-probe.
fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::error!("Failed to parse CSS selector '{}': {}", selector, e);
            None
        }
    }
}

static TITLE_SELECTOR: LazyLock<Option<Selector>> =
    LazyLock::new(|| parse_selector(TITLE_SELECTOR_STR));
static META_SELECTOR: LazyLock<Option<Selector>> =
    LazyLock::new(|| parse_selector(META_SELECTOR_STR));
static LINK_SELECTOR: LazyLock<Option<Selector>> =
    LazyLock::new(|| parse_selector(LINK_SELECTOR_STR));

/// The three fields scraped from a successful HTML page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub canonical: Option<String>,
}

impl PageMetadata {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.meta_description.is_none() && self.canonical.is_none()
    }
}

/// Returns true when a Content-Type header value names an HTML document.
///
/// Examples: "text/html", "text/html; charset=utf-8", "application/xhtml+xml"
pub fn is_html_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

/// Extracts title, meta description and canonical link from raw HTML.
pub fn extract_page_metadata(html: &str) -> PageMetadata {
    let document = Html::parse_document(html);

    PageMetadata {
        title: extract_title(&document),
        meta_description: extract_meta_description(&document),
        canonical: extract_canonical(&document),
    }
}

fn extract_title(document: &Html) -> Option<String> {
    let selector = TITLE_SELECTOR.as_ref()?;
    let element = document.select(selector).next()?;

    // Titles often span lines in the source; collapse the whitespace
    let title = element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    non_empty(title)
}

fn extract_meta_description(document: &Html) -> Option<String> {
    let selector = META_SELECTOR.as_ref()?;

    // The selector only guarantees name and content exist; name="Description"
    // and name=" description " both count
    document
        .select(selector)
        .find(|element| {
            element
                .value()
                .attr("name")
                .is_some_and(|name| name.trim().eq_ignore_ascii_case("description"))
        })
        .and_then(|element| element.value().attr("content"))
        .and_then(|content| non_empty(content.trim().to_string()))
}

fn extract_canonical(document: &Html) -> Option<String> {
    let selector = LINK_SELECTOR.as_ref()?;

    // rel is a space-separated token list, e.g. rel="canonical alternate"
    document
        .select(selector)
        .find(|element| {
            element.value().attr("rel").is_some_and(|rel| {
                rel.split_whitespace()
                    .any(|token| token.eq_ignore_ascii_case("canonical"))
            })
        })
        .and_then(|element| element.value().attr("href"))
        .and_then(|href| non_empty(href.trim().to_string()))
}

// Empty strings are reported as absent, never as Some("")
fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is the selector an Option inside a LazyLock?
//    - Selector::parse returns a Result, and a static cannot propagate it
//    - None means "this selector matches nothing", so extraction goes on
//
// 2. Why does element.text() need collect()?
//    - text() yields every text node under the element separately
//    - collect::<String>() glues them back together
// -----------------------------------------------------------------------------
