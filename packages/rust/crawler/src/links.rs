//! Same-domain outbound link extraction.

use std::collections::HashSet;

use scraper::{Html, Selector};
use url::Url;

/// Extract, resolve, and normalize the same-domain links on a page.
///
/// Fragment-only, `javascript:`, and `mailto:` targets are skipped. Absolute
/// paths resolve against the site base; other relative hrefs resolve against
/// the page's own URL. Fragments are stripped and in-page duplicates dropped;
/// cross-page deduplication is the crawl engine's visited-set job.
pub fn extract_links(doc: &Html, page_url: &Url, base_url: &Url) -> Vec<Url> {
    let anchor_sel = Selector::parse("a[href]").unwrap();
    let mut seen: HashSet<String> = HashSet::new();
    let mut links = Vec::new();

    for el in doc.select(&anchor_sel) {
        let Some(href) = el.value().attr("href").map(str::trim) else {
            continue;
        };
        if href.is_empty()
            || href.starts_with('#')
            || href.starts_with("javascript:")
            || href.starts_with("mailto:")
        {
            continue;
        }

        let resolved = if href.starts_with("http") {
            Url::parse(href)
        } else if href.starts_with('/') {
            base_url.join(href)
        } else {
            page_url.join(href)
        };

        let Ok(mut url) = resolved else {
            tracing::debug!(href, "skipping unparseable link");
            continue;
        };
        url.set_fragment(None);

        if url.host_str() != base_url.host_str() {
            continue;
        }
        if seen.insert(url.to_string()) {
            links.push(url);
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/").unwrap()
    }

    fn page() -> Url {
        Url::parse("https://example.com/products/widgets").unwrap()
    }

    fn links_of(html: &str) -> Vec<String> {
        let doc = Html::parse_document(html);
        extract_links(&doc, &page(), &base())
            .into_iter()
            .map(|u| u.to_string())
            .collect()
    }

    #[test]
    fn resolves_absolute_path_against_site_base() {
        let links = links_of(r#"<a href="/about">About</a>"#);
        assert_eq!(links, vec!["https://example.com/about"]);
    }

    #[test]
    fn resolves_relative_href_against_page_url() {
        let links = links_of(r#"<a href="gadgets">Gadgets</a>"#);
        assert_eq!(links, vec!["https://example.com/products/gadgets"]);
    }

    #[test]
    fn keeps_absolute_same_domain_links_only() {
        let links = links_of(concat!(
            r#"<a href="https://example.com/contact">Contact</a>"#,
            r#"<a href="https://elsewhere.net/page">External</a>"#,
        ));
        assert_eq!(links, vec!["https://example.com/contact"]);
    }

    #[test]
    fn skips_fragment_javascript_and_mailto() {
        let links = links_of(concat!(
            r##"<a href="#section">Jump</a>"##,
            r#"<a href="javascript:void(0)">Noop</a>"#,
            r#"<a href="mailto:info@example.com">Mail</a>"#,
            r#"<a href="">Empty</a>"#,
        ));
        assert!(links.is_empty());
    }

    #[test]
    fn strips_fragments_and_dedupes_within_page() {
        let links = links_of(concat!(
            r#"<a href="/faq#shipping">Shipping</a>"#,
            r#"<a href="/faq#returns">Returns</a>"#,
            r#"<a href="/faq">FAQ</a>"#,
        ));
        assert_eq!(links, vec!["https://example.com/faq"]);
    }
}
