//! Linear-scan relevance ranking over stored entries.
//!
//! Scoring is substring containment, presence-based per field, evaluated
//! once per query-term occurrence. The 10/5/1 weight table is a product
//! behavior, not an approximation of term-frequency ranking.

use sitekb_shared::Entry;

/// Default number of results when the caller does not pass a limit.
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Per-term weight for a title substring hit.
const TITLE_WEIGHT: u32 = 10;
/// Per-term weight for a hit in any tag.
const TAG_WEIGHT: u32 = 5;
/// Per-term weight for a content substring hit.
const CONTENT_WEIGHT: u32 = 1;

/// Rank `entries` against a free-text query.
///
/// Blank queries and empty stores yield an empty result. Entries scoring
/// zero are dropped; the rest sort by descending score with ties keeping
/// their original (crawl-insertion) order, truncated to `limit`.
pub fn search<'a>(entries: &'a [Entry], query: &str, limit: usize) -> Vec<&'a Entry> {
    if entries.is_empty() {
        return Vec::new();
    }
    let terms: Vec<String> = query
        .split_whitespace()
        .map(|t| t.to_lowercase())
        .collect();
    if terms.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(&Entry, u32)> = entries
        .iter()
        .map(|entry| (entry, score_entry(entry, &terms)))
        .filter(|(_, score)| *score > 0)
        .collect();

    // Stable sort: equal scores keep insertion order.
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.truncate(limit);
    scored.into_iter().map(|(entry, _)| entry).collect()
}

/// Score one entry; a term repeated in the query counts once per occurrence.
fn score_entry(entry: &Entry, terms: &[String]) -> u32 {
    let title = entry.title.to_lowercase();
    let content = entry.content.to_lowercase();
    let tags: Vec<String> = entry.tags.iter().map(|t| t.to_lowercase()).collect();

    let mut score = 0;
    for term in terms {
        if title.contains(term.as_str()) {
            score += TITLE_WEIGHT;
        }
        if tags.iter().any(|tag| tag.contains(term.as_str())) {
            score += TAG_WEIGHT;
        }
        if content.contains(term.as_str()) {
            score += CONTENT_WEIGHT;
        }
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, content: &str, tags: &[&str]) -> Entry {
        Entry::new(
            format!("https://example.com/{}", title.to_lowercase()),
            title,
            content,
            "General",
            tags.iter().map(|t| t.to_string()).collect(),
        )
    }

    #[test]
    fn blank_query_and_empty_store_return_nothing() {
        let entries = vec![entry("Invoices", "invoice help", &[])];
        assert!(search(&entries, "", 5).is_empty());
        assert!(search(&entries, "   ", 5).is_empty());
        assert!(search(&[], "invoice", 5).is_empty());
    }

    #[test]
    fn title_hit_outranks_content_hit() {
        let entries = vec![
            entry("Pricing", "invoice templates and pricing notes", &[]),
            entry("Invoice automation", "how we bill", &[]),
        ];

        let results = search(&entries, "invoice", 5);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Invoice automation");
        assert_eq!(results[1].title, "Pricing");
    }

    #[test]
    fn tag_hit_scores_between_title_and_content() {
        let entries = vec![
            entry("Billing", "no match here", &["invoicing"]),
            entry("Support", "mentions an invoice once", &[]),
        ];

        let results = search(&entries, "invoice", 5);
        // Tag hit (5) beats content hit (1).
        assert_eq!(results[0].title, "Billing");
        assert_eq!(results[1].title, "Support");
    }

    #[test]
    fn zero_score_entries_are_dropped() {
        let entries = vec![
            entry("Shipping", "delivery times", &[]),
            entry("Invoices", "billing", &[]),
        ];

        let results = search(&entries, "invoice", 5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Invoices");
    }

    #[test]
    fn repeated_terms_count_once_per_occurrence() {
        let a = entry("alpha", "nothing", &[]);
        let b = entry("other", "alpha alpha alpha", &[]);

        // "alpha alpha": title scores 20, content scores 2 — presence-based
        // per field, but doubled by the repeated query term.
        assert_eq!(score_entry(&a, &["alpha".into(), "alpha".into()]), 20);
        assert_eq!(score_entry(&b, &["alpha".into(), "alpha".into()]), 2);
    }

    #[test]
    fn multi_term_scores_accumulate_across_fields() {
        let e = entry("Invoice automation", "automation of invoice flows", &["automation"]);
        // invoice: title 10 + content 1; automation: title 10 + tag 5 + content 1.
        assert_eq!(score_entry(&e, &["invoice".into(), "automation".into()]), 27);
    }

    #[test]
    fn limit_truncates_and_ties_keep_insertion_order() {
        let entries = vec![
            entry("Invoice automation", "workflow", &[]), // 10 + 10 = 20
            entry("Notes", "invoice automation mentioned", &[]), // 1 + 1 = 2
            entry("Automation invoice", "both words", &[]), // 20, tied with first
            entry("Invoice", "automation", &[]),          // 10 + 1 = 11
            entry("Misc", "invoice", &[]),                // 1
        ];

        let results = search(&entries, "invoice automation", 2);
        assert_eq!(results.len(), 2);
        // Both 20-scorers rank above the 11; the tie keeps insertion order.
        assert_eq!(results[0].title, "Invoice automation");
        assert_eq!(results[1].title, "Automation invoice");
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let entries = vec![entry("INVOICES", "Bulk INVOICE processing", &[])];
        let results = search(&entries, "invoice", 5);
        assert_eq!(results.len(), 1);
    }
}
