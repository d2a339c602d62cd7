//! Include/exclude pattern gate deciding which visited URLs get fetched.

use regex::Regex;
use url::Url;

use sitekb_shared::{CrawlOptions, Result, SiteKbError};

/// Compiled URL scope filter for one build.
///
/// A URL is in scope when it matches at least one include pattern and no
/// exclude pattern. Patterns are regexes tested against the full URL string
/// and are compiled once per build; a pattern that fails to compile aborts
/// the build before any fetch.
#[derive(Debug)]
pub struct PatternFilter {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl PatternFilter {
    /// Compile the filter from crawl options. An empty include list falls
    /// back to the seed's own domain.
    pub fn compile(seed: &Url, options: &CrawlOptions) -> Result<Self> {
        let mut include_sources = options.include_patterns.clone();
        if include_sources.is_empty() {
            include_sources.push(default_include_pattern(seed)?);
        }

        Ok(Self {
            include: compile_all(&include_sources, "include")?,
            exclude: compile_all(&options.exclude_patterns, "exclude")?,
        })
    }

    /// Is this URL in scope for fetching?
    pub fn allows(&self, url: &str) -> bool {
        self.include.iter().any(|re| re.is_match(url))
            && !self.exclude.iter().any(|re| re.is_match(url))
    }
}

/// `^https?://<seed host>` — the same-domain default scope.
fn default_include_pattern(seed: &Url) -> Result<String> {
    let host = seed
        .host_str()
        .ok_or_else(|| SiteKbError::config(format!("seed URL '{seed}' has no host")))?;
    Ok(format!("^https?://{}", regex::escape(host)))
}

fn compile_all(patterns: &[String], kind: &str) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p)
                .map_err(|e| SiteKbError::config(format!("invalid {kind} pattern '{p}': {e}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed() -> Url {
        Url::parse("https://example.com/").unwrap()
    }

    #[test]
    fn default_scope_is_seed_domain() {
        let filter = PatternFilter::compile(&seed(), &CrawlOptions::default()).unwrap();

        assert!(filter.allows("https://example.com/products"));
        assert!(filter.allows("http://example.com/"));
        assert!(!filter.allows("https://other.example.org/products"));
    }

    #[test]
    fn default_excludes_reject_binary_extensions() {
        let filter = PatternFilter::compile(&seed(), &CrawlOptions::default()).unwrap();

        assert!(!filter.allows("https://example.com/catalog.pdf"));
        assert!(!filter.allows("https://example.com/logo.png"));
        assert!(filter.allows("https://example.com/catalog.html"));
    }

    #[test]
    fn custom_include_overrides_default() {
        let options = CrawlOptions {
            include_patterns: vec!["^https://example\\.com/docs".into()],
            ..CrawlOptions::default()
        };
        let filter = PatternFilter::compile(&seed(), &options).unwrap();

        assert!(filter.allows("https://example.com/docs/intro"));
        assert!(!filter.allows("https://example.com/blog/post"));
    }

    #[test]
    fn exclude_wins_over_include() {
        let options = CrawlOptions {
            exclude_patterns: vec!["/private".into()],
            ..CrawlOptions::default()
        };
        let filter = PatternFilter::compile(&seed(), &options).unwrap();

        assert!(!filter.allows("https://example.com/private/area"));
    }

    #[test]
    fn invalid_pattern_is_a_config_error() {
        let options = CrawlOptions {
            include_patterns: vec!["[".into()],
            ..CrawlOptions::default()
        };
        let err = PatternFilter::compile(&seed(), &options).unwrap_err();
        assert!(err.to_string().contains("invalid include pattern"));
    }

    #[test]
    fn hostless_seed_is_a_config_error() {
        let seed = Url::parse("data:text/plain,hello").unwrap();
        let err = PatternFilter::compile(&seed, &CrawlOptions::default()).unwrap_err();
        assert!(err.to_string().contains("no host"));
    }
}
