//! Page classification: title, body text, category, and tags from markup.
//!
//! The crawl engine talks to a [`PageClassifier`] so the DOM heuristics can
//! be swapped for structured-data or boilerplate-removal strategies without
//! touching traversal. [`HeuristicClassifier`] is the default.

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// What a classifier extracted from one page.
#[derive(Debug, Clone, Default)]
pub struct PageRecord {
    /// `<title>` text, trimmed. Empty when the page has no usable title.
    pub title: String,
    /// Whitespace-collapsed plain text of the main content area.
    pub content: String,
    /// Category label; `"General"` when nothing better is found.
    pub category: String,
    /// Deduplicated tags, insertion order preserved.
    pub tags: Vec<String>,
}

/// Strategy for turning a parsed page into a [`PageRecord`].
pub trait PageClassifier: Send + Sync {
    /// Extract title, content, category, and tags from the document.
    fn classify(&self, doc: &Html, url: &Url) -> PageRecord;

    /// Human-readable classifier name for tracing.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Heuristic default
// ---------------------------------------------------------------------------

/// Semantic containers likely to hold the main content, in document order.
const CONTENT_SELECTORS: &str = "main, .content, .main-content, article, .post-content";

/// Elements whose subtrees never contribute to body text.
const STRIP_TAGS: [&str; 5] = ["script", "style", "nav", "footer", "header"];
const STRIP_CLASSES: [&str; 2] = ["comments", "sidebar"];

/// DOM-heuristic classifier: semantic containers for content, breadcrumbs
/// then URL path for category, meta keywords plus tag elements for tags.
pub struct HeuristicClassifier;

impl PageClassifier for HeuristicClassifier {
    fn classify(&self, doc: &Html, url: &Url) -> PageRecord {
        PageRecord {
            title: extract_title(doc),
            content: extract_content(doc),
            category: extract_category(doc, url),
            tags: extract_tags(doc),
        }
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}

/// `<title>` element text, trimmed.
fn extract_title(doc: &Html) -> String {
    let title_sel = Selector::parse("title").unwrap();
    doc.select(&title_sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Text of the first semantic content container, with chrome subtrees
/// (scripts, navigation, sidebars, ...) skipped and whitespace collapsed.
/// Falls back to the whole `<body>` text when no container matches.
fn extract_content(doc: &Html) -> String {
    let content_sel = Selector::parse(CONTENT_SELECTORS).unwrap();
    if let Some(container) = doc.select(&content_sel).next() {
        let mut buf = String::new();
        collect_visible_text(container, &mut buf);
        return collapse_whitespace(&buf);
    }

    let body_sel = Selector::parse("body").unwrap();
    doc.select(&body_sel)
        .next()
        .map(|body| collapse_whitespace(&body.text().collect::<String>()))
        .unwrap_or_default()
}

/// Walk the subtree accumulating text nodes, skipping stripped elements.
fn collect_visible_text(root: ElementRef<'_>, out: &mut String) {
    for child in root.children() {
        if let Some(el) = ElementRef::wrap(child) {
            if !is_stripped(&el) {
                collect_visible_text(el, out);
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        }
    }
}

fn is_stripped(el: &ElementRef<'_>) -> bool {
    let element = el.value();
    STRIP_TAGS.contains(&element.name())
        || element.classes().any(|class| STRIP_CLASSES.contains(&class))
}

/// Second breadcrumb segment, else the first URL path segment, else "General".
fn extract_category(doc: &Html, url: &Url) -> String {
    let breadcrumb_sel = Selector::parse(".breadcrumbs").unwrap();
    if let Some(el) = doc.select(&breadcrumb_sel).next() {
        let trail = collapse_whitespace(&el.text().collect::<String>());
        let parts: Vec<&str> = trail.split(['>', '/']).map(str::trim).collect();
        match parts.get(1) {
            Some(second) if !second.is_empty() => return (*second).to_string(),
            _ => {}
        }
    }

    if let Some(mut segments) = url.path_segments() {
        if let Some(first) = segments.find(|segment| !segment.is_empty()) {
            return first.to_string();
        }
    }

    "General".to_string()
}

/// Comma-split meta keywords plus tag-element text, deduplicated in order.
fn extract_tags(doc: &Html) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();

    let keywords_sel = Selector::parse(r#"meta[name="keywords"]"#).unwrap();
    if let Some(content) = doc
        .select(&keywords_sel)
        .next()
        .and_then(|meta| meta.value().attr("content"))
    {
        for keyword in content.split(',') {
            let keyword = keyword.trim();
            if !keyword.is_empty() && !tags.iter().any(|t| t == keyword) {
                tags.push(keyword.to_string());
            }
        }
    }

    let tag_sel = Selector::parse(".tags a, .tag, .category a").unwrap();
    for el in doc.select(&tag_sel) {
        let tag = el.text().collect::<String>().trim().to_string();
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    tags
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
